//! Id to name maps and reference checks against the lookup tables.

use std::collections::HashMap;

use model::entities::{city, employee, expense_type, investor};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder,
};
use tracing::{debug, trace};

use crate::errors::{ApiError, ApiResult};

/// Names of every lookup row, used to label report and listing rows.
#[derive(Debug, Default)]
pub struct Lookups {
    pub cities: HashMap<i32, String>,
    pub employees: HashMap<i32, String>,
    pub investors: HashMap<i32, String>,
    pub expense_types: HashMap<i32, String>,
}

impl Lookups {
    pub async fn load(db: &DatabaseConnection) -> Result<Self, DbErr> {
        trace!("Loading lookup tables");
        Ok(Self {
            cities: city_names(db).await?,
            employees: employee::Entity::find()
                .all(db)
                .await?
                .into_iter()
                .map(|e| (e.id, e.name))
                .collect(),
            investors: investor::Entity::find()
                .all(db)
                .await?
                .into_iter()
                .map(|i| (i.id, i.name))
                .collect(),
            expense_types: expense_type_names(db).await?,
        })
    }

    pub fn city(&self, id: i32) -> String {
        self.cities.get(&id).cloned().unwrap_or_default()
    }

    pub fn employee(&self, id: i32) -> String {
        self.employees.get(&id).cloned().unwrap_or_default()
    }

    pub fn investor(&self, id: Option<i32>) -> Option<String> {
        id.and_then(|id| self.investors.get(&id).cloned())
    }

    pub fn expense_type(&self, id: i32) -> String {
        self.expense_types.get(&id).cloned().unwrap_or_default()
    }
}

pub async fn city_names(db: &DatabaseConnection) -> Result<HashMap<i32, String>, DbErr> {
    Ok(city::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

pub async fn expense_type_names(db: &DatabaseConnection) -> Result<HashMap<i32, String>, DbErr> {
    Ok(expense_type::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect())
}

/// All city names in alphabetical order.
pub async fn sorted_city_names(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    Ok(city::Entity::find()
        .order_by_asc(city::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect())
}

/// City restriction of a listing or report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityFilter {
    All,
    Only { id: i32, name: String },
    /// A name that matches no city; selects nothing.
    Unknown(String),
}

impl CityFilter {
    /// "all" or the requested city name.
    pub fn label(&self) -> String {
        match self {
            CityFilter::All => "all".to_string(),
            CityFilter::Only { name, .. } | CityFilter::Unknown(name) => name.clone(),
        }
    }
}

/// `None`, an empty value and "all" select every city.
pub async fn resolve_city_filter(
    db: &DatabaseConnection,
    city: Option<&str>,
) -> Result<CityFilter, DbErr> {
    let name = match city.map(str::trim) {
        None | Some("") | Some("all") => return Ok(CityFilter::All),
        Some(name) => name,
    };

    let filter = match city::Entity::find()
        .filter(city::Column::Name.eq(name))
        .one(db)
        .await?
    {
        Some(found) => CityFilter::Only {
            id: found.id,
            name: found.name,
        },
        None => {
            debug!("City filter '{}' matches no city", name);
            CityFilter::Unknown(name.to_string())
        }
    };

    Ok(filter)
}

/// Fails with a validation error when no `E` row has the given id.
pub async fn ensure_exists<E>(db: &DatabaseConnection, id: i32, what: &str) -> ApiResult<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    if E::find_by_id(id).one(db).await?.is_none() {
        return Err(ApiError::Validation(format!("{} {} does not exist", what, id)));
    }
    Ok(())
}

pub async fn ensure_optional_exists<E>(
    db: &DatabaseConnection,
    id: Option<i32>,
    what: &str,
) -> ApiResult<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    match id {
        Some(id) => ensure_exists::<E>(db, id, what).await,
        None => Ok(()),
    }
}
