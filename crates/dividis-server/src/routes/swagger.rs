//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Declaration models
    CreateDeclarationRequest,
    DeclarationReceiptResponse,
    DeclarationResponse,
    // Mission models
    GlobalMissionResponse,
    MissionProgressResponse,
    MissionResponse,
    MissionTargetResponse,
    // Progress models
    ModuleDetailResponse,
    ModuleProgressResponse,
    // Module models
    ModuleResponse,
    ProfileResponse,
    ProgressOverviewResponse,
    StreakResponse,
    UnlockedPillarResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Module endpoints
        super::modules::list_modules,
        super::modules::unlock_module,
        // Mission endpoints
        super::missions::list_available_missions,
        super::missions::list_global_missions,
        super::missions::complete_mission,
        super::missions::fail_mission,
        // Progress endpoints
        super::progress::get_profile,
        super::progress::list_streaks,
        super::progress::get_overview,
        super::progress::get_module_detail,
        super::progress::sync_progress,
        // Declaration endpoints
        super::declarations::create_declaration,
        super::declarations::list_declarations,
        super::declarations::list_unlocked_pillars,
    ),
    info(
        title = "Dividis API",
        version = "0.1.0",
        description = "Dividis progress API\n\nExperience points, levels, module unlocks, missions, streaks and pillar declarations.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Modules", description = "Modules - Life areas and their unlocks"),
        (name = "Missions", description = "Missions - Rewarded tasks, global and per module"),
        (name = "Progress", description = "Progress - XP, level, streaks and overview"),
        (name = "Declarations", description = "Declarations - Pillar reflections and rewards"),
    ),
    components(
        schemas(
            // Modules
            ModuleResponse,
            ModuleProgressResponse,
            // Missions
            MissionResponse,
            MissionProgressResponse,
            MissionTargetResponse,
            GlobalMissionResponse,
            // Progress
            ProfileResponse,
            StreakResponse,
            ProgressOverviewResponse,
            ModuleDetailResponse,
            // Declarations
            CreateDeclarationRequest,
            DeclarationResponse,
            DeclarationReceiptResponse,
            UnlockedPillarResponse,
        )
    ),
)]
pub struct ApiDoc;
