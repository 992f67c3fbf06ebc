// Document-level extraction: raw text from uploads, skill gazetteer, identity.

pub mod extractor;
pub mod gazetteer;
pub mod identity;
