use super::ApiError;

pub fn validate_title_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid title ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_page(page: u64) -> Result<u64, ApiError> {
    if page == 0 {
        return Err(ApiError::validation(
            "Invalid page: 0. Pages start at 1",
        ));
    }
    Ok(page)
}

pub fn validate_per_page(per_page: u64, max_per_page: u64) -> Result<u64, ApiError> {
    const MIN_PER_PAGE: u64 = 1;

    if !(MIN_PER_PAGE..=max_per_page).contains(&per_page) {
        return Err(ApiError::validation(format!(
            "Invalid perpage: {per_page}. perpage must be between {MIN_PER_PAGE} and {max_per_page}"
        )));
    }
    Ok(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_id() {
        assert!(validate_title_id(1).is_ok());
        assert!(validate_title_id(123_456_789).is_ok());
        assert!(validate_title_id(0).is_err());
        assert!(validate_title_id(-1).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert!(validate_page(1).is_ok());
        assert!(validate_page(9_999).is_ok());
        assert!(validate_page(0).is_err());
    }

    #[test]
    fn test_validate_per_page() {
        assert!(validate_per_page(1, 1000).is_ok());
        assert!(validate_per_page(1000, 1000).is_ok());
        assert!(validate_per_page(0, 1000).is_err());
        assert!(validate_per_page(1001, 1000).is_err());
    }
}
