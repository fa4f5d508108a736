use consolekit_auth::AbilityContext;

/// What a guarded view shows for the current inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    /// The protected children, with the ability context made available to
    /// descendants when one exists.
    Children { ability: Option<AbilityContext> },

    /// Neutral blank shell. Reveals nothing about the protected content.
    BlankShell,

    /// Caller-supplied loading placeholder.
    Fallback,

    /// Nothing observable.
    Nothing,
}

impl Rendering {
    pub fn shows_children(&self) -> bool {
        matches!(self, Rendering::Children { .. })
    }

    pub fn ability(&self) -> Option<&AbilityContext> {
        match self {
            Rendering::Children { ability } => ability.as_ref(),
            _ => None,
        }
    }
}
