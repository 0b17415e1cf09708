//! Declaration Reward Engine
//!
//! The first declaration on a (user, module, pillar) earns a one-time bonus
//! that grows with the module's rank. Every declaration counts as activity.

use serde::Serialize;
use uuid::Uuid;

use super::{streaks, ProgressEngine};
use crate::domain::{errors::DomainError, Declaration, Pillar, Profile, Streak, UnlockedPillar};
use crate::ports::{CatalogRepository, DeclarationFilter, ProgressRepository};

/// Result of a declaration submission
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationReceipt {
    pub declaration: Declaration,
    /// Zero unless this was the first declaration of its pillar
    pub xp_awarded: i32,
    pub profile: Profile,
    pub streak: Streak,
}

impl<C: CatalogRepository, P: ProgressRepository> ProgressEngine<C, P> {
    pub async fn submit_declaration(
        &self,
        user_id: Uuid,
        module_id: &str,
        pillar: &str,
        text: &str,
        synced: bool,
    ) -> Result<DeclarationReceipt, DomainError> {
        let pillar: Pillar = pillar.parse().map_err(DomainError::Validation)?;
        if text.trim().is_empty() {
            return Err(DomainError::Validation(
                "Declaration text cannot be empty".to_string(),
            ));
        }
        let module = self
            .catalog
            .find_module(module_id)
            .await?
            .ok_or_else(|| DomainError::not_found_str("Module", module_id))?;

        let now = self.clock.now();
        let mut tx = self.progress.begin().await?;
        // Locked first so concurrent first declarations of a user queue up here
        let mut profile = tx.lock_profile(user_id, now).await?;

        let candidate = Declaration::new(user_id, &module.id, pillar, text, synced, now);
        let declaration = tx.insert_declaration(&candidate).await?;

        let mut xp_awarded = 0;
        let first_in_pillar = tx.count_other_declarations(&declaration).await? == 0
            && tx
                .insert_unlocked_pillar(&UnlockedPillar::new(user_id, &module.id, pillar, now))
                .await?;
        if first_in_pillar {
            xp_awarded = module.declaration_bonus();
            profile.grant_xp(xp_awarded, now)?;
            tx.save_profile(&profile).await?;
            tracing::info!(
                "User {} opened pillar {} in {}: +{} XP",
                user_id,
                pillar,
                module.id,
                xp_awarded
            );
        }

        let streak = streaks::touch_in(tx.as_mut(), user_id, &module.id, now).await?;
        tx.commit().await?;

        Ok(DeclarationReceipt {
            declaration,
            xp_awarded,
            profile,
            streak,
        })
    }

    /// Declarations of a user, newest first
    pub async fn declarations(
        &self,
        user_id: Uuid,
        module_id: Option<&str>,
        pillar: Option<&str>,
    ) -> Result<Vec<Declaration>, DomainError> {
        let pillar = pillar
            .map(|p| p.parse::<Pillar>().map_err(DomainError::Validation))
            .transpose()?;
        let filter = DeclarationFilter {
            module_id: module_id.map(str::to_string),
            pillar,
            created_since: None,
        };
        self.progress.list_declarations(user_id, &filter).await
    }
}
