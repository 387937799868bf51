use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}
