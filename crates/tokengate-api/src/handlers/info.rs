// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-protected information handlers.

use crate::extractors::Auth;

/// GET /getUserInfo
pub async fn get_user_info(Auth(identity): Auth) -> String {
    format!("User Information[{}]", identity.subject())
}

/// GET /getAdminInfo
pub async fn get_admin_info(Auth(identity): Auth) -> String {
    format!("Admin Information[{}]", identity.subject())
}
