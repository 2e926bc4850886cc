//! Single token validation.

use crate::{
    error::{Error, Result},
    settings::Settings,
    time::{Clock, Expiration, SystemClock},
    token::Token,
};
use std::sync::Arc;
use ucan_did::Plugins;

/// Validates tokens and resolves their proof chains.
///
/// Holds the verifier [`Plugins`], the [`Clock`] that defines "now" and the
/// [`Settings`]. A validator is immutable and can be shared freely between
/// tasks.
#[derive(Debug, Clone)]
pub struct Validator<C = SystemClock> {
    plugins: Arc<Plugins>,
    clock: C,
    settings: Settings,
}

impl Validator<SystemClock> {
    /// A validator using the wall clock and default settings.
    #[must_use]
    pub fn new(plugins: Arc<Plugins>) -> Self {
        Self {
            plugins,
            clock: SystemClock,
            settings: Settings::default(),
        }
    }
}

impl<C: Clock> Validator<C> {
    /// Replace the time source.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> Validator<D> {
        Validator {
            plugins: self.plugins,
            clock,
            settings: self.settings,
        }
    }

    /// Replace the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Getter for the verifier plugins.
    #[must_use]
    pub fn plugins(&self) -> &Plugins {
        &self.plugins
    }

    /// Getter for the settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Getter for the clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Decode and validate a single token, ignoring its proofs.
    ///
    /// # Errors
    ///
    /// Fails if the token does not decode, or [`Validator::check`] fails.
    pub async fn validate(&self, encoded: &str) -> Result<Token> {
        let token = Token::decode(encoded)?;
        self.check(&token).await?;
        Ok(token)
    }

    /// Validate an already decoded token.
    ///
    /// In order: the header algorithm must match the issuer's key type, the
    /// signature must verify over the signed segments, and "now" must be
    /// within `[nbf, exp)`.
    ///
    /// # Errors
    ///
    /// Returns the first check that fails.
    pub async fn check(&self, token: &Token) -> Result<()> {
        let issuer = token.issuer();
        let alg = &token.header().alg;

        if !self.plugins.verify_issuer_alg(issuer, alg)? {
            return Err(Error::InvalidAlgorithm {
                issuer: issuer.to_string(),
                alg: alg.clone(),
            });
        }

        let verified = self
            .plugins
            .verify_signature(issuer, token.signed_data().as_bytes(), token.signature())
            .await?;
        if !verified {
            tracing::debug!(%issuer, "signature rejected");
            return Err(Error::InvalidSignature {
                issuer: issuer.to_string(),
            });
        }

        let now = self.clock.now();
        if self.settings.check_not_before
            && let Some(not_before) = token.not_before()
            && now < not_before
        {
            return Err(Error::NotYetValid { not_before });
        }
        if self.settings.check_expiration
            && let Expiration::At(expiration) = token.expiration()
            && now >= expiration
        {
            return Err(Error::Expired { expiration });
        }

        tracing::trace!(%issuer, audience = %token.audience(), "token validated");
        Ok(())
    }
}
