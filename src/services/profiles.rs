use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::profile::{
        ApplicationStatus, ClientProfile, CounselorApplication, Profile, Role,
    },
    repositories::{application as application_repo, profile as profile_repo},
    services::notify,
    state::AppState,
};

/// Creates a profile owned by the calling account.
///
/// An account carries at most one profile; new profiles start as clients and
/// become counselors through the application flow.
pub async fn create_profile(
    state: &AppState,
    user_id: Uuid,
    username: String,
    bio: String,
) -> Result<Profile> {
    if profile_repo::find_by_user(&state.db, &user_id).await?.is_some() {
        return Err(AppError::Validation(
            "This account already has a profile.".to_string(),
        ));
    }

    let profile = profile_repo::create_profile(
        &state.db,
        Uuid::new_v4(),
        user_id,
        username,
        Role::Client,
        bio,
    )
    .await?;

    tracing::info!("✅ Profile created: {}", profile.id);
    Ok(profile)
}

/// Resolves the caller's profile, failing if they have not created one yet.
pub async fn require_profile(state: &AppState, user_id: Uuid) -> Result<Profile> {
    profile_repo::find_by_user(&state.db, &user_id)
        .await?
        .ok_or_else(|| {
            AppError::Authentication("This account has no profile yet.".to_string())
        })
}

/// Lists profiles, optionally filtered by role.
pub async fn list_profiles(state: &AppState, role: Option<Role>) -> Result<Vec<Profile>> {
    profile_repo::list_profiles(&state.db, role).await
}

/// Fetches a profile by ID.
pub async fn get_profile(state: &AppState, profile_id: Uuid) -> Result<Profile> {
    profile_repo::find_by_id(&state.db, &profile_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Updates the caller's own biography.
pub async fn update_own_bio(
    state: &AppState,
    caller: &Profile,
    profile_id: Uuid,
    bio: String,
) -> Result<Profile> {
    if caller.id != profile_id {
        return Err(AppError::Unauthorized);
    }
    profile_repo::update_bio(&state.db, &profile_id, bio)
        .await?
        .ok_or(AppError::NotFound)
}

/// Attaches client-specific details to the caller's profile.
pub async fn create_client_profile(
    state: &AppState,
    caller: &Profile,
    age: i32,
    gender: String,
    preferences: Option<String>,
) -> Result<ClientProfile> {
    if age <= 0 {
        return Err(AppError::Validation("Age must be positive".to_string()));
    }
    if profile_repo::find_client_profile(&state.db, &caller.id).await?.is_some() {
        return Err(AppError::Validation(
            "This profile already has client details.".to_string(),
        ));
    }
    profile_repo::create_client_profile(
        &state.db,
        Uuid::new_v4(),
        caller.id,
        age,
        gender,
        preferences,
    )
    .await
}

/// Lists all client detail records.
pub async fn list_client_profiles(state: &AppState) -> Result<Vec<ClientProfile>> {
    profile_repo::list_client_profiles(&state.db).await
}

/// Submits a counselor application for the caller's profile.
pub async fn submit_application(
    state: &AppState,
    caller: &Profile,
    specialization: String,
    experience_years: i32,
    availability: String,
    certifications: String,
) -> Result<CounselorApplication> {
    if specialization.trim().is_empty() {
        return Err(AppError::Validation(
            "Specialization cannot be empty".to_string(),
        ));
    }
    if experience_years < 0 {
        return Err(AppError::Validation(
            "Experience years cannot be negative".to_string(),
        ));
    }

    let application = application_repo::create_application(
        &state.db,
        Uuid::new_v4(),
        caller.id,
        specialization,
        experience_years,
        availability,
        certifications,
    )
    .await?;

    tracing::info!(
        "Counselor application {} submitted by profile {}",
        application.id,
        caller.id
    );
    Ok(application)
}

/// Lists counselor applications, newest first.
pub async fn list_applications(state: &AppState) -> Result<Vec<CounselorApplication>> {
    application_repo::list_applications(&state.db).await
}

/// Fetches a counselor application by ID.
pub async fn get_application(state: &AppState, application_id: Uuid) -> Result<CounselorApplication> {
    application_repo::find_by_id(&state.db, &application_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Updates an application's status.
///
/// Approval promotes the applicant's profile to the counselor role and
/// notifies them by email. The notification is best-effort and never fails
/// the approval itself.
pub async fn review_application(
    state: &AppState,
    application_id: Uuid,
    status: ApplicationStatus,
) -> Result<CounselorApplication> {
    let application = application_repo::update_status(&state.db, &application_id, status)
        .await?
        .ok_or(AppError::NotFound)?;

    if status == ApplicationStatus::Approved {
        let profile = profile_repo::set_role(&state.db, &application.profile_id, Role::Counselor)
            .await?
            .ok_or(AppError::NotFound)?;
        tracing::info!("✅ Profile {} promoted to counselor", profile.id);
        notify::application_approved(&profile.username).await;
    }

    Ok(application)
}
