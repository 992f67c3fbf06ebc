//! English stopword list, matched against lowercased tokens.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    pub static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","across","after","afterwards","again","against","all","almost","alone","along",
            "already","also","although","always","am","among","amongst","amount","an","and","another","any",
            "anyhow","anyone","anything","anyway","anywhere","are","aren't","around","as","at",
            "back","be","became","because","become","becomes","becoming","been","before","beforehand","behind",
            "being","below","beside","besides","between","beyond","both","bottom","but","by",
            "call","can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","done","down","due","during",
            "each","eight","either","eleven","else","elsewhere","empty","enough","even","ever","every",
            "everyone","everything","everywhere","except",
            "few","fifteen","fifty","first","five","for","former","formerly","forty","four","from","front",
            "full","further",
            "get","give","go",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","hence","her",
            "here","here's","hereafter","hereby","herein","hereupon","hers","herself","him","himself","his",
            "how","how's","however","hundred",
            "i","i'd","i'll","i'm","i've","if","in","indeed","into","is","isn't","it","it's","its","itself",
            "just",
            "keep",
            "last","latter","latterly","least","less","let's",
            "made","make","many","may","me","meanwhile","might","mine","more","moreover","most","mostly",
            "move","much","must","mustn't","my","myself",
            "name","namely","neither","never","nevertheless","next","nine","no","nobody","none","noone",
            "nor","not","nothing","now","nowhere",
            "of","off","often","on","once","one","only","onto","or","other","others","otherwise","ought",
            "our","ours","ourselves","out","over","own",
            "part","per","perhaps","please","put",
            "quite",
            "rather","re","really","regarding",
            "same","say","see","seem","seemed","seeming","seems","serious","several","she","she'd","she'll",
            "she's","should","shouldn't","show","side","since","six","sixty","so","some","somehow",
            "someone","something","sometime","sometimes","somewhere","still","such",
            "take","ten","than","that","that's","the","their","theirs","them","themselves","then","thence",
            "there","there's","thereafter","thereby","therefore","therein","thereupon","these","they",
            "they'd","they'll","they're","they've","third","this","those","though","three","through",
            "throughout","thru","thus","to","together","too","top","toward","towards","twelve","twenty",
            "two",
            "under","unless","until","up","upon","us","used","using",
            "various","very","via",
            "was","wasn't","we","we'd","we'll","we're","we've","well","were","weren't","what","what's",
            "whatever","when","when's","whence","whenever","where","where's","whereafter","whereas",
            "whereby","wherein","whereupon","wherever","whether","which","while","whither","who","who's",
            "whoever","whole","whom","whose","why","why's","will","with","within","without","won't",
            "would","wouldn't",
            "yet","you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(lowercase_token: &str) -> bool {
    STOPWORDS.contains(lowercase_token)
}
