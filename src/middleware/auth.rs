use crate::config::AppConfig;
use crate::utils::error::CustomError;
use actix_web::{Error, HttpMessage, dev::ServiceRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Token lifetime in hours
const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub exp: usize,
}

/// Verify the bearer JWT and stash its claims in the request extensions
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let secret = match req.app_data::<web::Data<AppConfig>>() {
        Some(config) => config.jwt_secret.clone(),
        None => {
            log::error!("AppConfig missing from app data, cannot verify tokens");
            return Err((
                CustomError::InternalServerError("Authentication is not configured".into()).into(),
                req,
            ));
        }
    };

    match decode_token(credentials.token(), &secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(e) => Err((e.into(), req)),
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, CustomError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Rejected token: {}", e);
        CustomError::UnauthenticatedError("Not authenticated.".into())
    })
}

/// Create a signed JWT for the given user
pub fn create_token(user_id: &str, email: &str, secret: &str) -> Result<String, CustomError> {
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp();

    let claims = Claims {
        id: user_id.to_owned(),
        email: email.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CustomError::InternalServerError(format!("Token generation failed: {}", e)))
}

/// Caller id from request extensions (use after auth middleware)
pub fn get_user_id_from_request(req: &actix_web::HttpRequest) -> Result<ObjectId, CustomError> {
    let id = req
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.id.clone())
        .ok_or_else(|| CustomError::UnauthenticatedError("Not authenticated.".into()))?;

    ObjectId::parse_str(&id)
        .map_err(|_| CustomError::UnauthenticatedError("Not authenticated.".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        let user_id = ObjectId::new().to_hex();
        let token = create_token(&user_id, "max@example.com", "secret").unwrap();

        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.id, user_id);
        assert_eq!(claims.email, "max@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("abc", "max@example.com", "secret").unwrap();
        assert!(matches!(
            decode_token(&token, "other"),
            Err(CustomError::UnauthenticatedError(_))
        ));
    }
}
