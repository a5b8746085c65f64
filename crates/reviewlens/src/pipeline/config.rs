use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichConfig {
    pub batch_size: usize,
    pub text_column: String,
    pub category_column: String,
}

impl EnrichConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size,
            text_column: config.dataset.text_column.clone(),
            category_column: config.dataset.category_column.clone(),
        }
    }
}
