use serde::Deserialize;

use crate::error::ApiError;
use crate::products::repo_types::ProductInput;

const MAX_NAME_LEN: usize = 255;

/// Body of `POST /product` and `PUT /product/:id`.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    pub price: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductRequest {
    pub fn validate(self) -> Result<ProductInput, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("name is required".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ApiError::Validation("name is too long".into()));
        }
        let price = self
            .price
            .ok_or_else(|| ApiError::Validation("price is required".into()))?;
        if price < 0 {
            return Err(ApiError::Validation("price must not be negative".into()));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(ProductInput {
            name: name.to_string(),
            price,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ProductInput, ApiError> {
        serde_json::from_str::<ProductRequest>(json).unwrap().validate()
    }

    #[test]
    fn accepts_minimal_product() {
        let input = parse(r#"{"name":"Widget","price":5}"#).unwrap();
        assert_eq!(input.name, "Widget");
        assert_eq!(input.price, 5);
        assert_eq!(input.description, None);
    }

    #[test]
    fn rejects_missing_or_bad_fields() {
        assert!(matches!(parse(r#"{"price":5}"#), Err(ApiError::Validation(_))));
        assert!(matches!(parse(r#"{"name":"  ","price":5}"#), Err(ApiError::Validation(_))));
        assert!(matches!(parse(r#"{"name":"W"}"#), Err(ApiError::Validation(_))));
        assert!(matches!(parse(r#"{"name":"W","price":-1}"#), Err(ApiError::Validation(_))));
    }

    #[test]
    fn blank_description_becomes_none() {
        let input = parse(r#"{"name":"W","price":0,"description":"   "}"#).unwrap();
        assert_eq!(input.description, None);
    }
}
