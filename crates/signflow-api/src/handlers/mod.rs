pub mod create_document;
