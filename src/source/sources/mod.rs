/// Directory-of-tabular-files article source.
pub mod article_files;
