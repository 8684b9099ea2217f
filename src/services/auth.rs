// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{TenantRepository, UserRepository},
    models::{
        auth::{Claims, LoginPayload, RegisterCustomerPayload, RegisterPharmacyPayload, User, UserRole},
        tenancy::Tenant,
    },
};

const TOKEN_VALIDITY_SECS: i64 = 60 * 60 * 24;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tenant_repo: TenantRepository,
    pool: PgPool,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tenant_repo: TenantRepository,
        pool: PgPool,
        jwt_secret: String,
    ) -> Self {
        Self {
            user_repo,
            tenant_repo,
            pool,
            jwt_secret,
        }
    }

    /// Creates the Tenant (PENDING) and its OWNER user in one
    /// transaction, so an OWNER can never exist without its tenant.
    pub async fn register_pharmacy(
        &self,
        payload: &RegisterPharmacyPayload,
    ) -> Result<Tenant, AppError> {
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)?;
        let slug = slugify(&payload.pharmacy_name);

        let mut tx = self.pool.begin().await?;

        let tenant = self
            .tenant_repo
            .create_tenant(
                &mut *tx,
                &payload.pharmacy_name,
                &slug,
                &payload.email,
                &payload.address,
                &payload.license_number,
                payload.license_url.as_deref(),
                payload.lat,
                payload.lng,
            )
            .await?;

        self.user_repo
            .create_user(
                &mut *tx,
                &payload.email,
                &password_hash,
                UserRole::Owner,
                Some(tenant.id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(tenant = %tenant.slug, "pharmacy registered, pending approval");
        Ok(tenant)
    }

    pub async fn register_customer(
        &self,
        payload: &RegisterCustomerPayload,
    ) -> Result<User, AppError> {
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)?;
        let user = self
            .user_repo
            .create_user(&self.pool, &payload.email, &password_hash, UserRole::Patient, None)
            .await?;
        Ok(user)
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !bcrypt::verify(&payload.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        self.issue_token(&user)
    }

    fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            tenant_id: user.tenant_id,
            iat: now as usize,
            exp: (now + TOKEN_VALIDITY_SECS) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Re-reads the user on every request so deactivation takes effect
    /// immediately, not at token expiry.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InvalidToken);
        }
        Ok(user)
    }
}

/// URL-safe slug from the pharmacy name: lowercase, spaces to hyphens,
/// everything else non-alphanumeric dropped.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c)
            } else if c == ' ' || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slug_is_lowercase_and_hyphenated() {
        assert_eq!(slugify("City Care Pharmacy"), "city-care-pharmacy");
    }

    #[test]
    fn slug_drops_punctuation_and_collapses_spaces() {
        assert_eq!(slugify("St. Mary's   Pharmacy"), "st-marys-pharmacy");
        assert_eq!(slugify("  Edge  "), "edge");
    }

    #[test]
    fn slug_keeps_digits() {
        assert_eq!(slugify("Pharmacy 24/7"), "pharmacy-247");
    }
}
