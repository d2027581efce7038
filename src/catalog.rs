//! Product catalog: browsing published products and publishing new ones.

use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;
use crate::error::{EncargoError, Result};
use crate::http::{ApiRequest, FilePart, HttpClient, MultipartForm};

/// A published product in the catalog.
///
/// The backend is loose about which presentation fields are set (a product
/// may carry an STL model, images, both, or neither), so everything beyond
/// the identity is optional or defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "stlUrl", default)]
    pub stl_url: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Value,
}

/// Input for publishing a new product.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub material: String,
    pub stock: u32,
    /// STL model file, if the seller uploaded one
    pub stl_file: Option<FilePart>,
    /// Product photos
    pub image_files: Vec<FilePart>,
}

impl NewProduct {
    fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::default()
            .text("name", self.name)
            .text("description", self.description)
            .text("price", self.price.to_string())
            .text("material", self.material)
            .text("stock", self.stock.to_string());

        if let Some(stl) = self.stl_file {
            form = form.file("stl_file", stl);
        }
        for image in self.image_files {
            form = form.file("image_files", image);
        }

        form
    }
}

/// Client for the product catalog endpoints.
pub struct Catalog<H: HttpClient, A: AuthContext> {
    http: H,
    auth: A,
}

impl<H: HttpClient, A: AuthContext> Catalog<H, A> {
    pub fn new(http: H, auth: A) -> Self {
        Self { http, auth }
    }

    /// List all published products. Unauthenticated read.
    #[tracing::instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>> {
        let response = self.http.execute(&ApiRequest::get("/products/"), None).await?;
        if !response.is_success() {
            return Err(EncargoError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            });
        }
        response.json()
    }

    /// Publish a new product as the logged-in seller.
    ///
    /// Uploads the metadata fields plus the optional STL model and any image
    /// files as one multipart form. A rejection surfaces the backend's
    /// `detail` message when it sends one.
    #[tracing::instrument(skip(self, product), fields(name = %product.name))]
    pub async fn publish(&self, product: NewProduct) -> Result<Product> {
        let token = self.auth.access_token();
        let response = self
            .http
            .execute_multipart("/products/create/", product.into_form(), token.as_deref())
            .await?;

        if !response.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&response.body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
                .unwrap_or_else(|| response.body.clone());
            return Err(EncargoError::PublishRejected {
                status: response.status,
                detail,
            });
        }

        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_tolerates_sparse_fields() {
        let raw = r#"{"id": 3, "name": "Bracket"}"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.id, 3);
        assert_eq!(product.price, 0.0);
        assert_eq!(product.stl_url, None);

        let raw = r#"{"id": 4, "name": "Vase", "stlUrl": "https://cdn.example.com/vase.stl", "price": 12.5}"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.stl_url.as_deref(), Some("https://cdn.example.com/vase.stl"));
        assert_eq!(product.price, 12.5);
    }

    #[test]
    fn test_new_product_form_layout() {
        let form = NewProduct {
            name: "Gear".to_string(),
            description: "Spur gear".to_string(),
            price: 9.99,
            material: "PLA".to_string(),
            stock: 5,
            stl_file: Some(FilePart {
                file_name: "gear.stl".to_string(),
                bytes: vec![1, 2, 3],
            }),
            image_files: vec![
                FilePart {
                    file_name: "a.png".to_string(),
                    bytes: vec![4],
                },
                FilePart {
                    file_name: "b.png".to_string(),
                    bytes: vec![5],
                },
            ],
        }
        .into_form();

        assert_eq!(form.texts[0], ("name".to_string(), "Gear".to_string()));
        assert_eq!(form.texts[2], ("price".to_string(), "9.99".to_string()));
        assert_eq!(form.texts[4], ("stock".to_string(), "5".to_string()));
        assert_eq!(form.files.len(), 3);
        assert_eq!(form.files[0].0, "stl_file");
        // Repeated field name, one part per image
        assert_eq!(form.files[1].0, "image_files");
        assert_eq!(form.files[2].0, "image_files");
    }
}
