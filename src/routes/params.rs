use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    domain::catalogue::SortMode,
    models::{Difficulty, TicketStatus},
};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogueQuery {
    /// Search text; falls back to similarity matching when nothing contains it.
    pub q: Option<String>,
    /// Category name, `all` or empty for every category.
    pub category: Option<String>,
    pub sort: Option<SortMode>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FaqQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TicketQuery {
    pub status: Option<TicketStatus>,
}
