use crate::models::EntryInput;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Team name is required")]
    MissingTeamName,
    #[error("Description is required")]
    MissingDescription,
    #[error("Category is required")]
    MissingCategory,
}

/// Checks that the required fields of a submission are present.
/// Content and URLs are taken as-is.
pub fn validate_entry_input(input: &EntryInput) -> Result<(), ValidationError> {
    if input.title.trim().is_empty() { return Err(ValidationError::MissingTitle); }
    if input.team_name.trim().is_empty() { return Err(ValidationError::MissingTeamName); }
    if input.description.trim().is_empty() { return Err(ValidationError::MissingDescription); }
    if input.category.is_none() { return Err(ValidationError::MissingCategory); }

    Ok(())
}
