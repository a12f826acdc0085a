use validator::{Validate, ValidationErrors};

use crate::model::CreateAccountRequestBody;

/// Stateless predicate over [`CreateAccountRequestBody`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateAccountValidator;

impl CreateAccountValidator {
    /// Whether `request` may be handed to a [`super::CreateAccountService`].
    pub fn test(&self, request: &CreateAccountRequestBody) -> bool {
        self.check(request).is_ok()
    }

    /// Same rules as [`Self::test`], keeping the failing fields.
    pub fn check(
        &self,
        request: &CreateAccountRequestBody,
    ) -> Result<(), ValidationErrors> {
        request.validate()
    }
}
