//! The session script: a strict linear sequence of stages with no cycles and
//! no branching on success. The only non-linear behavior is early termination
//! on the first failure, after which no later stage executes — except logoff
//! and teardown, which run best-effort on every path and never mask the
//! first error.

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::{HoursError, Result};
use crate::selectors;
use crate::session::PortalSession;
use crate::wait::WaitConfig;

/// Pause after rapid programmatic entry so client-side scripting can digest
/// it before review. A deliberate concession to UI latency, not a
/// correctness guarantee.
const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Launch,
    Authenticate,
    WaitTimesheet,
    FillEntries,
    Submit,
    Logoff,
}

impl Stage {
    /// Execution order of the pipeline.
    pub const ORDER: [Stage; 6] = [
        Stage::Launch,
        Stage::Authenticate,
        Stage::WaitTimesheet,
        Stage::FillEntries,
        Stage::Submit,
        Stage::Logoff,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Launch => "launch",
            Stage::Authenticate => "authenticate",
            Stage::WaitTimesheet => "wait-timesheet",
            Stage::FillEntries => "fill-entries",
            Stage::Submit => "submit",
            Stage::Logoff => "logoff",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub headless: bool,
    pub wait: WaitConfig,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            headless: true,
            wait: WaitConfig::default(),
        }
    }
}

/// Run the whole flow to completion or fail loudly on the first error.
///
/// The browser session is released on both paths. No partial-success state is
/// recoverable or resumable.
pub async fn run(credentials: &Credentials, options: &RunOptions) -> Result<()> {
    info!(target = "hours", stage = %Stage::Launch, url = %credentials.url, "launching portal session");
    let mut session = PortalSession::launch(credentials, options.headless, options.wait).await?;

    let outcome = drive(&mut session, credentials).await;
    finish(session, outcome).await
}

/// Stages between launch and logoff, aborting on the first failure.
async fn drive(session: &mut PortalSession, credentials: &Credentials) -> Result<()> {
    at_stage(Stage::Authenticate, authenticate(session, credentials)).await?;
    at_stage(Stage::WaitTimesheet, open_timesheet(session)).await?;
    at_stage(Stage::FillEntries, fill_entries(session)).await?;
    at_stage(Stage::Submit, submit_and_confirm(session)).await?;
    Ok(())
}

async fn at_stage<F>(stage: Stage, work: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    info!(target = "hours", %stage, "stage starting");
    match work.await {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!(target = "hours", %stage, error = %err, "stage failed");
            Err(err)
        }
    }
}

/// Logoff and teardown. Runs even after a failed stage; those late errors are
/// logged but never replace the first one.
async fn finish(mut session: PortalSession, outcome: Result<()>) -> Result<()> {
    let logoff = at_stage(Stage::Logoff, log_off(&mut session)).await;
    let closed = session.close().await;
    match outcome {
        Ok(()) => {
            info!(target = "hours", "timesheet run completed");
            logoff.and(closed)
        }
        Err(first) => {
            if let Err(err) = closed {
                warn!(target = "hours", error = %err, "browser close failed");
            }
            Err(first)
        }
    }
}

/// Populate the logon form and submit with a Return keystroke. Success is not
/// confirmed here; a bad login surfaces later as a timeout waiting for
/// post-login elements.
async fn authenticate(session: &PortalSession, credentials: &Credentials) -> Result<()> {
    session
        .type_css(selectors::USERNAME_FIELD, &credentials.username)
        .await?;
    session
        .type_css_and_submit(selectors::PASSWORD_FIELD, &credentials.password)
        .await
}

/// Wait out the asynchronously rendering post-login UI: navigation entry,
/// the two nested frames, then the first weekday input.
async fn open_timesheet(session: &mut PortalSession) -> Result<()> {
    session.wait_clickable(selectors::TIMESHEET_NAV).await?;
    session.click_id(selectors::TIMESHEET_NAV).await?;

    session.enter_frame(selectors::CONTENT_FRAME).await?;
    session.enter_frame(selectors::WORK_AREA_FRAME).await?;

    session.wait_present(&selectors::day_field(1)).await
}

/// Enter the fixed hour value for weekdays 1 through 5, in order. The first
/// failed lookup aborts the whole fill.
async fn fill_entries(session: &PortalSession) -> Result<()> {
    for day in 1..=selectors::WEEKDAYS {
        session
            .clear_and_type(&selectors::day_field(day), selectors::HOURS_VALUE)
            .await?;
    }
    Ok(())
}

/// Review, save, and verify the confirmation message.
async fn submit_and_confirm(session: &PortalSession) -> Result<()> {
    tokio::time::sleep(SETTLE_DELAY).await;

    session.click_id(selectors::REVIEW_BUTTON).await?;

    session.wait_present(selectors::SAVE_BUTTON).await?;
    session.click_id(selectors::SAVE_BUTTON).await?;

    session.wait_present(selectors::MESSAGE_AREA).await?;
    let message = session.element_text(selectors::MESSAGE_AREA).await?;
    if confirms_save(&message) {
        info!(target = "hours", %message, "save confirmed");
        Ok(())
    } else {
        Err(HoursError::Submission(message))
    }
}

/// Exit any nested frame context, click through the logoff dialog, and wait
/// for the home page title.
async fn log_off(session: &mut PortalSession) -> Result<()> {
    session.reset_frames();
    session.click_css(selectors::LOGOFF_BUTTON).await?;
    session.click_css(selectors::LOGOFF_CONFIRM).await?;
    session
        .wait_title("home page title", selectors::is_home_title)
        .await
}

/// Whether the portal's message area text reports a successful save.
fn confirms_save(message: &str) -> bool {
    selectors::SAVED_MESSAGES
        .iter()
        .any(|expected| message.contains(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_strict_and_linear() {
        assert_eq!(
            Stage::ORDER,
            [
                Stage::Launch,
                Stage::Authenticate,
                Stage::WaitTimesheet,
                Stage::FillEntries,
                Stage::Submit,
                Stage::Logoff,
            ]
        );
    }

    #[test]
    fn stage_names_render_for_logs() {
        let names: Vec<String> = Stage::ORDER.iter().map(Stage::to_string).collect();
        assert_eq!(
            names,
            [
                "launch",
                "authenticate",
                "wait-timesheet",
                "fill-entries",
                "submit",
                "logoff"
            ]
        );
    }

    #[test]
    fn known_confirmation_texts_pass() {
        assert!(confirms_save("Your data has been saved"));
        assert!(confirms_save("No data was changed"));
        // Embedded in surrounding message chrome.
        assert!(confirms_save("  Your data has been saved\n"));
    }

    #[test]
    fn unexpected_confirmation_text_fails() {
        assert!(!confirms_save(""));
        assert!(!confirms_save("Your data could not be saved"));
        assert!(!confirms_save("Session expired"));
    }

    #[test]
    fn default_options_run_headless_with_default_wait() {
        let options = RunOptions::default();
        assert!(options.headless);
        assert_eq!(options.wait, WaitConfig::default());
    }
}
