use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WineDetail {
    pub name: Option<String>,
    pub producer: Option<String>,
    pub grapes: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub year: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
}
