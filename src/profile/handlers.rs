use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::auth::services::AuthUser;
use crate::error::AppError;
use crate::profile::model::{BudgetTier, Profile};
use crate::profile::repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub household_size: i32,
    #[serde(default)]
    pub dietary_preference: String,
    pub budget_tier: String,
    #[serde(default)]
    pub location: String,
}

impl ProfileRequest {
    fn validate(&self) -> Result<BudgetTier, AppError> {
        if self.household_size < 1 {
            return Err(AppError::validation("household_size must be at least 1"));
        }
        self.budget_tier
            .parse::<BudgetTier>()
            .map_err(|_| AppError::validation(format!("unknown budget tier '{}'", self.budget_tier)))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Profile>, AppError> {
    let profile = repo::get(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let budget_tier = payload.validate()?;
    let profile = repo::update(
        &state.db,
        user_id,
        payload.household_size,
        payload.dietary_preference.trim(),
        budget_tier,
        payload.location.trim(),
    )
    .await?
    .ok_or(AppError::NotFound("profile"))?;
    info!(%user_id, "profile updated");
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_household_and_unknown_tier() {
        let r = ProfileRequest {
            household_size: 0,
            dietary_preference: String::new(),
            budget_tier: "Low".into(),
            location: String::new(),
        };
        assert!(r.validate().is_err());

        let r = ProfileRequest {
            household_size: 2,
            dietary_preference: String::new(),
            budget_tier: "Extravagant".into(),
            location: String::new(),
        };
        assert!(r.validate().is_err());

        let r = ProfileRequest {
            household_size: 2,
            dietary_preference: "vegetarian".into(),
            budget_tier: "high".into(),
            location: "Dhaka".into(),
        };
        assert_eq!(r.validate().unwrap(), BudgetTier::High);
    }
}
