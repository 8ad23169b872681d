//! Stable identifiers the portal exposes.
//!
//! UI automation is coupled to the remote markup by nature; every identifier
//! the script depends on lives here so a portal-side rename is a one-file
//! fix. SAP Web Dynpro element ids contain dots, which makes them invalid in
//! CSS id selectors, so lookups go through `getElementById` (see
//! [`crate::session`]).

/// Substring the landing page title must contain.
pub const PORTAL_TITLE: &str = "SAP NetWeaver Portal";

/// Title prefix (case-insensitive) of the post-logoff home page.
pub const HOME_TITLE_PREFIX: &str = "home";

/// Logon form fields. These two are plain ids, safe for CSS selectors.
pub const USERNAME_FIELD: &str = "#logonuidfield";
pub const PASSWORD_FIELD: &str = "#logonpassfield";

/// Navigation entry that opens the weekly timesheet.
pub const TIMESHEET_NAV: &str = "L2N2";

/// Outer content frame, and the isolated work area nested inside it.
pub const CONTENT_FRAME: &str = "contentAreaFrame";
pub const WORK_AREA_FRAME: &str = "isolatedWorkArea";

/// "Review" button on the entry view.
pub const REVIEW_BUTTON: &str = "aaaaKEBH.VcCatRecordEntryView.ButtonNext";

/// "Save" button on the review view.
pub const SAVE_BUTTON: &str =
    "aaaaLBOD.VcGenericButtonView.Save_com_sap_xss_hr_cat_record_vac_review_VcCatRecordReview";

/// Message area that carries the save confirmation text.
pub const MESSAGE_AREA: &str = "aaaaLMJA.WDMsgBox.MessageArea-txt";

/// Logoff button and its confirmation dialog, both top-level CSS.
pub const LOGOFF_BUTTON: &str = "#buttonlogoff > span.button_inner";
pub const LOGOFF_CONFIRM: &str = "div.button_middle";

/// Hours entered for every weekday.
pub const HOURS_VALUE: &str = "8";

/// Number of weekday fields in the weekly timesheet.
pub const WEEKDAYS: u8 = 5;

/// Confirmation texts the portal shows after a successful save.
pub const SAVED_MESSAGES: [&str; 2] = ["Your data has been saved", "No data was changed"];

/// Composite id of a weekday's hours input, `day` in `1..=5`.
pub fn day_field(day: u8) -> String {
    format!("aaaaKEBH.VcCatTableWeek.WORKDATE{day}_InputField.0")
}

/// Whether a page title identifies the portal landing page.
pub fn is_portal_title(title: &str) -> bool {
    title.contains(PORTAL_TITLE)
}

/// Whether a page title identifies the post-logoff home page.
pub fn is_home_title(title: &str) -> bool {
    title.to_lowercase().starts_with(HOME_TITLE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_field_encodes_week_and_day() {
        assert_eq!(
            day_field(1),
            "aaaaKEBH.VcCatTableWeek.WORKDATE1_InputField.0"
        );
        assert_eq!(
            day_field(5),
            "aaaaKEBH.VcCatTableWeek.WORKDATE5_InputField.0"
        );
    }

    #[test]
    fn portal_title_matches_by_containment() {
        assert!(is_portal_title("SAP NetWeaver Portal"));
        assert!(is_portal_title("Acme Corp - SAP NetWeaver Portal - Overview"));
        assert!(!is_portal_title("Proxy error"));
        assert!(!is_portal_title(""));
    }

    #[test]
    fn home_title_matches_prefix_case_insensitively() {
        assert!(is_home_title("Home - Portal"));
        assert!(is_home_title("home"));
        assert!(is_home_title("HOME PAGE"));
        assert!(!is_home_title("Welcome Home"));
        assert!(!is_home_title("SAP NetWeaver Portal"));
    }

    #[test]
    fn day_fields_are_distinct_per_weekday() {
        let ids: Vec<String> = (1..=WEEKDAYS).map(day_field).collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(ids.iter().filter(|other| *other == id).count(), 1, "{i}");
        }
    }
}
