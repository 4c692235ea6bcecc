use crate::api::attendance::{
    AttendancePayload, BulkAttendancePayload, BulkEntry,
};
use crate::api::dpr::DprPayload;
use crate::api::inventory::InventoryPayload;
use crate::api::site::SitePayload;
use crate::api::staff::StaffPayload;
use crate::api::work_type::WorkTypePayload;
use crate::model::attendance::{AttendanceRow, AttendanceStatus, StatusCount};
use crate::model::dpr::{DprRow, DprSummaryRow, StructureProgressRow};
use crate::model::inventory::{InventoryRow, MovementType, StockRow};
use crate::model::site::{Site, SiteBrief};
use crate::model::staff::{StaffBrief, StaffRow};
use crate::model::work_type::WorkType;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Construction Site Management API",
        version = "1.0.0",
        description = "Sites, staff, attendance, daily progress reports, material inventory, \
work-type catalogs, and a consolidated dashboard. All endpoints except login/register \
require JWT bearer authentication and answer with a `{success, message, data}` envelope."
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::register,
        crate::auth::handlers::profile,

        crate::api::site::list_sites,
        crate::api::site::get_site,
        crate::api::site::create_site,
        crate::api::site::update_site,
        crate::api::site::delete_site,
        crate::api::site::site_stats,

        crate::api::staff::list_staff,
        crate::api::staff::get_staff,
        crate::api::staff::create_staff,
        crate::api::staff::update_staff,
        crate::api::staff::delete_staff,

        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::bulk_create_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::attendance_summary,

        crate::api::dpr::list_dpr,
        crate::api::dpr::get_dpr,
        crate::api::dpr::create_dpr,
        crate::api::dpr::update_dpr,
        crate::api::dpr::delete_dpr,
        crate::api::dpr::dpr_summary,
        crate::api::dpr::cumulative_progress,

        crate::api::inventory::list_inventory,
        crate::api::inventory::get_inventory,
        crate::api::inventory::create_inventory,
        crate::api::inventory::update_inventory,
        crate::api::inventory::delete_inventory,
        crate::api::inventory::inventory_summary,

        crate::api::work_type::list_work_types,
        crate::api::work_type::get_work_type,
        crate::api::work_type::create_work_type,
        crate::api::work_type::update_work_type,
        crate::api::work_type::delete_work_type,

        crate::api::dashboard::get_dashboard,
        crate::api::dashboard::get_site_dashboard,
    ),
    components(
        schemas(
            LoginRequest,
            RegisterRequest,
            LoginResponse,
            UserInfo,
            Site,
            SiteBrief,
            SitePayload,
            StaffRow,
            StaffBrief,
            StaffPayload,
            AttendanceRow,
            AttendanceStatus,
            AttendancePayload,
            BulkEntry,
            BulkAttendancePayload,
            StatusCount,
            DprRow,
            DprPayload,
            DprSummaryRow,
            StructureProgressRow,
            InventoryRow,
            MovementType,
            InventoryPayload,
            StockRow,
            WorkType,
            WorkTypePayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and account management"),
        (name = "Sites", description = "Construction site registry"),
        (name = "Staff", description = "Site staff registry"),
        (name = "Attendance", description = "Daily attendance marking and summaries"),
        (name = "DPR", description = "Daily progress reports"),
        (name = "Inventory", description = "Material movements and stock"),
        (name = "WorkTypes", description = "Work-type catalog"),
        (name = "Dashboard", description = "Aggregated operational views"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
