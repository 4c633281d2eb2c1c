//! Admin guard.

use salvo::prelude::*;

use crate::{errors::ApiError, extensions::*};

/// Reject authenticated users without the admin role.
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.user_or_401() {
        Ok(user) if user.is_admin() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_) => {
            res.render(ApiError::forbidden("Admin access required"));
            ctrl.skip_rest();
        }
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();
        }
    }
}
