//! Route definitions for the application

use dioxus::prelude::*;
use treasury_client::Role;

use crate::components::PortalLayout;
use crate::pages::{
    Audit, CitizenHome, Dashboard, Financial, Login, Ministries, MinistryDetail, NotFound, PayTax,
    TaxPayments, Transparency,
};

/// All application routes
#[derive(Clone, Debug, PartialEq, Routable)]
#[rustfmt::skip]
pub enum Route {
    // Public routes
    #[route("/login")]
    Login {},

    #[route("/transparency")]
    Transparency {},

    // Everything inside the layout goes through the session gate
    #[layout(PortalLayout)]
        #[route("/")]
        Dashboard {},

        #[route("/ministries")]
        Ministries {},

        #[route("/ministries/:id")]
        MinistryDetail { id: i64 },

        #[route("/financial")]
        Financial {},

        #[route("/tax-payments")]
        TaxPayments {},

        #[route("/audit")]
        Audit {},

        #[route("/citizen")]
        CitizenHome {},

        #[route("/citizen/pay-tax")]
        PayTax {},
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    /// Role a signed-in identity needs to open this view. `None` means any
    /// signed-in identity (the gate still turns anonymous visitors away).
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Ministries {} | Route::MinistryDetail { .. } => Some(Role::MinistryAdmin),
            Route::Financial {} | Route::TaxPayments {} | Route::Audit {} => {
                Some(Role::SuperAdmin)
            }
            Route::CitizenHome {} | Route::PayTax {} => Some(Role::Citizen),
            Route::Login {}
            | Route::Transparency {}
            | Route::Dashboard {}
            | Route::NotFound { .. } => None,
        }
    }

    /// Views that render without asking the gate.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login {} | Route::Transparency {} | Route::NotFound { .. }
        )
    }
}

/// Where a freshly signed-in identity lands.
pub fn landing_route(role: Role) -> Route {
    match role {
        Role::MinistryAdmin | Role::MinistryOfficer => Route::Ministries {},
        Role::SuperAdmin | Role::Citizen => Route::Dashboard {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treasury_client::{authorize, Access, Identity, Redirect, Session};

    fn session(role: Role) -> Session {
        Session::new(
            "token",
            Identity {
                office_name: "Office".into(),
                wallet_address: "0xabc".into(),
                role,
                ministry_id: None,
            },
        )
    }

    #[test]
    fn landing_routes_match_role_paths() {
        for role in Role::variants() {
            assert_eq!(landing_route(*role).to_string(), role.landing_path());
        }
    }

    #[test]
    fn paths_round_trip_through_the_router() {
        assert_eq!("/ministries/7".parse::<Route>().ok(), Some(Route::MinistryDetail { id: 7 }));
        assert_eq!("/citizen/pay-tax".parse::<Route>().ok(), Some(Route::PayTax {}));
        assert_eq!(Route::TaxPayments {}.to_string(), "/tax-payments");
    }

    #[test]
    fn super_admin_opens_every_gated_view() {
        let admin = session(Role::SuperAdmin);
        for route in [
            Route::Dashboard {},
            Route::Ministries {},
            Route::MinistryDetail { id: 1 },
            Route::Financial {},
            Route::TaxPayments {},
            Route::Audit {},
            Route::CitizenHome {},
            Route::PayTax {},
        ] {
            assert!(authorize(Some(&admin), route.required_role()).is_allowed());
        }
    }

    #[test]
    fn citizens_are_sent_home_from_ministry_views() {
        let citizen = session(Role::Citizen);
        assert_eq!(
            authorize(Some(&citizen), Route::Ministries {}.required_role()),
            Access::Deny(Redirect::Home)
        );
        assert!(authorize(Some(&citizen), Route::PayTax {}.required_role()).is_allowed());
    }

    #[test]
    fn anonymous_visitors_only_see_public_views() {
        assert_eq!(
            authorize(None, Route::Dashboard {}.required_role()),
            Access::Deny(Redirect::Login)
        );
        assert!(Route::Transparency {}.is_public());
        assert!(!Route::Dashboard {}.is_public());
    }
}
