// Address data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::store::{Entity, Value};
use crate::users::UserResponse;
use crate::validation::validate_not_blank;

/// Address database model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Brasil")]
    pub country: String,
    #[schema(example = "SP")]
    pub state: String,
    #[schema(example = "Campinas")]
    pub city: String,
    #[schema(example = "Cambui")]
    pub neighborhood: String,
    #[schema(example = "13024000")]
    pub zip_code: String,
    pub complement: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create address request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAddressRequest {
    pub user_id: Uuid,

    #[validate(
        length(max = 100, message = "Country must not exceed 100 characters."),
        custom = "validate_not_blank"
    )]
    pub country: String,

    #[validate(
        length(max = 100, message = "State must not exceed 100 characters."),
        custom = "validate_not_blank"
    )]
    pub state: String,

    #[validate(
        length(max = 100, message = "City must not exceed 100 characters."),
        custom = "validate_not_blank"
    )]
    pub city: String,

    #[validate(
        length(max = 200, message = "Neighborhood must not exceed 200 characters."),
        custom = "validate_not_blank"
    )]
    pub neighborhood: String,

    #[validate(
        length(max = 9, message = "Zip code must not exceed 9 characters."),
        custom = "validate_not_blank"
    )]
    pub zip_code: String,

    #[validate(length(max = 200, message = "Complement must not exceed 200 characters."))]
    pub complement: Option<String>,
}

/// Update address request DTO; the owner cannot be changed
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAddressRequest {
    #[validate(length(max = 100), custom = "validate_not_blank")]
    pub country: Option<String>,

    #[validate(length(max = 100), custom = "validate_not_blank")]
    pub state: Option<String>,

    #[validate(length(max = 100), custom = "validate_not_blank")]
    pub city: Option<String>,

    #[validate(length(max = 200), custom = "validate_not_blank")]
    pub neighborhood: Option<String>,

    #[validate(
        length(max = 9, message = "Zip code must not exceed 9 characters."),
        custom = "validate_not_blank"
    )]
    pub zip_code: Option<String>,

    #[validate(length(max = 200))]
    pub complement: Option<String>,
}

impl Entity for Address {
    const TABLE: &'static str = "addresses";
    const NAME: &'static str = "Address";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "country",
        "state",
        "city",
        "neighborhood",
        "zip_code",
        "complement",
        "created_at",
        "updated_at",
    ];

    type New = CreateAddressRequest;
    type Patch = UpdateAddressRequest;

    fn id(&self) -> Uuid {
        self.id
    }

    fn insert_values(new: CreateAddressRequest) -> Vec<(&'static str, Value)> {
        vec![
            ("user_id", Value::Uuid(new.user_id)),
            ("country", Value::Text(new.country)),
            ("state", Value::Text(new.state)),
            ("city", Value::Text(new.city)),
            ("neighborhood", Value::Text(new.neighborhood)),
            ("zip_code", Value::Text(new.zip_code)),
            ("complement", Value::NullableText(new.complement)),
        ]
    }

    fn merge(&mut self, patch: UpdateAddressRequest) {
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(neighborhood) = patch.neighborhood {
            self.neighborhood = neighborhood;
        }
        if let Some(zip_code) = patch.zip_code {
            self.zip_code = zip_code;
        }
        if patch.complement.is_some() {
            self.complement = patch.complement;
        }
    }

    fn update_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("country", Value::Text(self.country.clone())),
            ("state", Value::Text(self.state.clone())),
            ("city", Value::Text(self.city.clone())),
            ("neighborhood", Value::Text(self.neighborhood.clone())),
            ("zip_code", Value::Text(self.zip_code.clone())),
            ("complement", Value::NullableText(self.complement.clone())),
        ]
    }
}

/// An address together with its owner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressDetail {
    #[serde(flatten)]
    pub address: Address,
    pub user: UserResponse,
}

/// Query parameters for listing addresses
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAddressesQuery {
    /// Only addresses owned by this user
    pub user_id: Option<Uuid>,
    /// Case-insensitive substring match on state
    pub state: Option<String>,
    /// Case-insensitive substring match on country
    pub country: Option<String>,
    /// Page number (1-indexed); requires `limit`
    pub page: Option<u32>,
    /// Items per page
    pub limit: Option<u32>,
}
