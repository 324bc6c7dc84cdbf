//! Typed navigation surface.
//!
//! Replaces string-path event dispatch with declared destinations, each
//! carrying its own authentication requirement. The shell asks `resolve`
//! where a path leads and whether it must show a sign-in/sign-up prompt
//! first.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    Home,
    Marketplace,
    KnowledgeHub,
    VendorRegistration,
    VendorProfile,
    UserProfile,
    Cart,
    Checkout,
    OrderConfirmation,
}

/// Which interstitial a gated destination prompts for when no session is
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptView {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    Public,
    Gated(PromptView),
}

impl Destination {
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Destination::Home),
            "/marketplace" => Some(Destination::Marketplace),
            "/knowledge-hub" => Some(Destination::KnowledgeHub),
            "/vendor-registration" => Some(Destination::VendorRegistration),
            "/vendor/profile" => Some(Destination::VendorProfile),
            "/user/profile" => Some(Destination::UserProfile),
            "/cart" => Some(Destination::Cart),
            "/checkout" => Some(Destination::Checkout),
            "/order-confirmation" => Some(Destination::OrderConfirmation),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Destination::Home => "/",
            Destination::Marketplace => "/marketplace",
            Destination::KnowledgeHub => "/knowledge-hub",
            Destination::VendorRegistration => "/vendor-registration",
            Destination::VendorProfile => "/vendor/profile",
            Destination::UserProfile => "/user/profile",
            Destination::Cart => "/cart",
            Destination::Checkout => "/checkout",
            Destination::OrderConfirmation => "/order-confirmation",
        }
    }

    /// Registration prompts for sign-up; the other gated destinations prompt
    /// for sign-in. The cart itself stays public.
    pub fn auth_requirement(self) -> AuthRequirement {
        match self {
            Destination::VendorRegistration => AuthRequirement::Gated(PromptView::SignUp),
            Destination::VendorProfile
            | Destination::UserProfile
            | Destination::Checkout
            | Destination::OrderConfirmation => AuthRequirement::Gated(PromptView::SignIn),
            Destination::Home
            | Destination::Marketplace
            | Destination::KnowledgeHub
            | Destination::Cart => AuthRequirement::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavOutcome {
    /// Navigate to the destination.
    Show { destination: Destination },
    /// The destination is gated and no session is present.
    PromptSignIn { view: PromptView },
    UnknownPath,
}

pub fn resolve(path: &str, signed_in: bool) -> NavOutcome {
    let Some(destination) = Destination::parse(path) else {
        return NavOutcome::UnknownPath;
    };
    match destination.auth_requirement() {
        AuthRequirement::Public => NavOutcome::Show { destination },
        AuthRequirement::Gated(_) if signed_in => NavOutcome::Show { destination },
        AuthRequirement::Gated(view) => NavOutcome::PromptSignIn { view },
    }
}
