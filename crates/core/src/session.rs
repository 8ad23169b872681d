//! Explicit browser session handle.
//!
//! [`PortalSession`] owns the Chromium process, the CDP event loop, the open
//! page, and the current frame context. Every stage receives the handle
//! instead of assuming ambient browser state, and the session is closed
//! exactly once, on success and failure paths both.
//!
//! The portal is SAP Web Dynpro markup: element ids contain dots, which rules
//! out CSS id selectors, and the timesheet lives inside two nested frames.
//! Frame-scoped interactions therefore evaluate JavaScript routed through
//! `window.frames[..].document` and `getElementById`, while the few dot-free
//! top-level controls (logon fields, logoff buttons) use the driver's native
//! element API.

use chromiumoxide::Element;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::Credentials;
use crate::error::{HoursError, Result};
use crate::selectors;
use crate::wait::WaitConfig;

pub struct PortalSession {
    browser: Browser,
    page: Page,
    events: JoinHandle<()>,
    /// Names of entered nested frames, innermost last. Empty means the
    /// top-level document.
    frames: Vec<String>,
    wait: WaitConfig,
}

impl PortalSession {
    /// Launch Chromium routed through the configured proxy auto-configuration
    /// URL, open the portal URL, and verify the landing page title.
    pub async fn launch(credentials: &Credentials, headless: bool, wait: WaitConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg(format!("--proxy-pac-url={}", credentials.proxy_url));
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(HoursError::Launch)?;

        debug!(target = "hours", headless, "starting browser");
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| HoursError::Launch(err.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page(credentials.url.as_str()).await {
            Ok(page) => page,
            Err(err) => {
                let _ = browser.close().await;
                events.abort();
                return Err(HoursError::Navigation {
                    url: credentials.url.clone(),
                    source: anyhow::Error::new(err),
                });
            }
        };

        let session = Self {
            browser,
            page,
            events,
            frames: Vec::new(),
            wait,
        };

        if let Err(err) = session.verify_landing_title().await {
            let _ = session.close().await;
            return Err(err);
        }

        Ok(session)
    }

    /// Landing page must be the portal; anything else means a wrong URL, a
    /// proxy failure, or the site being down.
    async fn verify_landing_title(&self) -> Result<()> {
        let _ = self.page.wait_for_navigation().await;
        let title = self.title().await.unwrap_or_default();
        if selectors::is_portal_title(&title) {
            debug!(target = "hours", %title, "landing page verified");
            Ok(())
        } else {
            Err(HoursError::Launch(format!(
                "unexpected page title {title:?}, expected it to contain {:?}",
                selectors::PORTAL_TITLE
            )))
        }
    }

    pub async fn title(&self) -> Option<String> {
        self.page.get_title().await.ok().flatten()
    }

    /// Frames entered so far, innermost last.
    pub fn frame_path(&self) -> &[String] {
        &self.frames
    }

    /// Wait for a nested frame to become available, then switch context into
    /// it: subsequent frame-scoped lookups resolve inside that frame.
    pub async fn enter_frame(&mut self, name: &str) -> Result<()> {
        let js = frame_probe_js(&self.frames, name);
        let condition = format!("frame `{name}` available");
        let session: &PortalSession = &*self;
        session
            .wait
            .until(&condition, || {
                let js = js.clone();
                async move { session.eval_bool(&js).await.then_some(()) }
            })
            .await?;
        self.frames.push(name.to_string());
        debug!(target = "hours", frame = %name, depth = self.frames.len(), "entered frame");
        Ok(())
    }

    /// Switch back to the top-level document, exiting any nested frames.
    pub fn reset_frames(&mut self) {
        self.frames.clear();
    }

    /// Wait for an element (by id, frame-scoped) to be present in the DOM.
    pub async fn wait_present(&self, id: &str) -> Result<()> {
        let js = present_probe_js(&self.doc_expr(), id);
        let condition = format!("element `{id}` present");
        self.wait
            .until(&condition, || {
                let js = js.clone();
                async move { self.eval_bool(&js).await.then_some(()) }
            })
            .await
    }

    /// Wait for an element (by id, frame-scoped) to be visible and enabled.
    pub async fn wait_clickable(&self, id: &str) -> Result<()> {
        let js = clickable_probe_js(&self.doc_expr(), id);
        let condition = format!("element `{id}` clickable");
        self.wait
            .until(&condition, || {
                let js = js.clone();
                async move { self.eval_bool(&js).await.then_some(()) }
            })
            .await
    }

    /// Wait until the page title satisfies `matches`.
    pub async fn wait_title(&self, condition: &str, matches: fn(&str) -> bool) -> Result<()> {
        self.wait
            .until(condition, || async move {
                let title = self.title().await?;
                matches(&title).then_some(())
            })
            .await
    }

    /// Click an element by id in the current frame context.
    pub async fn click_id(&self, id: &str) -> Result<()> {
        let js = click_js(&self.doc_expr(), id);
        if self.eval_action(&js).await? {
            Ok(())
        } else {
            Err(HoursError::ElementNotFound { id: id.to_string() })
        }
    }

    /// Focus an input by id, clear any existing value, and type a new one.
    pub async fn clear_and_type(&self, id: &str, value: &str) -> Result<()> {
        let js = set_value_js(&self.doc_expr(), id, value);
        if self.eval_action(&js).await? {
            Ok(())
        } else {
            Err(HoursError::ElementNotFound { id: id.to_string() })
        }
    }

    /// Text content of an element by id in the current frame context.
    pub async fn element_text(&self, id: &str) -> Result<String> {
        let js = text_js(&self.doc_expr(), id);
        match self.page.evaluate(js.as_str()).await?.into_value::<Option<String>>() {
            Ok(Some(text)) => Ok(text),
            _ => Err(HoursError::ElementNotFound { id: id.to_string() }),
        }
    }

    /// Click a top-level element by CSS selector.
    pub async fn click_css(&self, selector: &str) -> Result<()> {
        self.find_css(selector).await?.click().await?;
        Ok(())
    }

    /// Click a top-level input, type into it.
    pub async fn type_css(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.find_css(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// Like [`Self::type_css`], then submit with a Return keystroke.
    pub async fn type_css_and_submit(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.find_css(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        element.press_key("Enter").await?;
        Ok(())
    }

    /// Close the browser and reap the process. Consumes the session so it can
    /// happen at most once.
    pub async fn close(mut self) -> Result<()> {
        debug!(target = "hours", "closing browser session");
        let closed = self.browser.close().await;
        if closed.is_ok() {
            let _ = self.browser.wait().await;
        }
        self.events.abort();
        closed.map(|_| ()).map_err(HoursError::from)
    }

    async fn find_css(&self, selector: &str) -> Result<Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| HoursError::ElementNotFound {
                id: selector.to_string(),
            })
    }

    fn doc_expr(&self) -> String {
        frame_document_expr(&self.frames)
    }

    /// Evaluate a boolean probe; driver errors while the page is mid-render
    /// count as "not ready yet".
    async fn eval_bool(&self, js: &str) -> bool {
        match self.page.evaluate(js).await {
            Ok(result) => result.into_value::<bool>().unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Evaluate an action that reports whether its target element existed.
    async fn eval_action(&self, js: &str) -> Result<bool> {
        Ok(self.page.evaluate(js).await?.into_value::<bool>().unwrap_or(false))
    }
}

/// Quote a string as a JavaScript string literal.
fn js_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Document of the current frame context: `window.frames[..].document`.
fn frame_document_expr(frames: &[String]) -> String {
    let mut expr = String::from("window");
    for name in frames {
        expr.push_str(".frames[");
        expr.push_str(&js_str(name));
        expr.push(']');
    }
    expr.push_str(".document");
    expr
}

/// Probe for a nested frame (below the current path) with a reachable
/// document. Cross-origin frames throw on access, hence the try/catch.
fn frame_probe_js(frames: &[String], name: &str) -> String {
    let mut chain = String::from("window");
    for entered in frames {
        chain.push_str(".frames[");
        chain.push_str(&js_str(entered));
        chain.push(']');
    }
    chain.push_str(".frames[");
    chain.push_str(&js_str(name));
    chain.push(']');
    format!(
        "(() => {{ try {{ const w = {chain}; return !!(w && w.document); }} catch (err) {{ return false; }} }})()"
    )
}

fn present_probe_js(doc: &str, id: &str) -> String {
    let id = js_str(id);
    format!(
        "(() => {{ try {{ return !!{doc}.getElementById({id}); }} catch (err) {{ return false; }} }})()"
    )
}

fn clickable_probe_js(doc: &str, id: &str) -> String {
    let id = js_str(id);
    format!(
        "(() => {{ try {{ const el = {doc}.getElementById({id}); \
         return !!el && !el.disabled && el.offsetParent !== null; }} \
         catch (err) {{ return false; }} }})()"
    )
}

fn click_js(doc: &str, id: &str) -> String {
    let id = js_str(id);
    format!(
        "(() => {{ const el = {doc}.getElementById({id}); if (!el) return false; \
         el.click(); return true; }})()"
    )
}

fn set_value_js(doc: &str, id: &str, value: &str) -> String {
    let id = js_str(id);
    let value = js_str(value);
    format!(
        "(() => {{ const el = {doc}.getElementById({id}); if (!el) return false; \
         el.focus(); el.click(); el.value = \"\"; el.value = {value}; \
         el.dispatchEvent(new Event(\"input\", {{ bubbles: true }})); \
         el.dispatchEvent(new Event(\"change\", {{ bubbles: true }})); \
         return true; }})()"
    )
}

fn text_js(doc: &str, id: &str) -> String {
    let id = js_str(id);
    format!(
        "(() => {{ const el = {doc}.getElementById({id}); \
         return el ? el.textContent : null; }})()"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_document_expr() {
        assert_eq!(frame_document_expr(&[]), "window.document");
    }

    #[test]
    fn nested_frames_chain_in_entry_order() {
        let frames = vec!["contentAreaFrame".to_string(), "isolatedWorkArea".to_string()];
        assert_eq!(
            frame_document_expr(&frames),
            "window.frames[\"contentAreaFrame\"].frames[\"isolatedWorkArea\"].document"
        );
    }

    #[test]
    fn frame_probe_extends_current_path() {
        let frames = vec!["contentAreaFrame".to_string()];
        let js = frame_probe_js(&frames, "isolatedWorkArea");
        assert!(js.contains("window.frames[\"contentAreaFrame\"].frames[\"isolatedWorkArea\"]"));
        assert!(js.contains("try"));
    }

    #[test]
    fn js_str_escapes_quotes_and_backslashes() {
        assert_eq!(js_str(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn lookups_use_get_element_by_id() {
        // Web Dynpro ids contain dots; a CSS `#id` lookup would misparse them.
        let js = present_probe_js("window.document", "aaaaKEBH.VcCatTableWeek.WORKDATE1_InputField.0");
        assert!(js.contains("getElementById(\"aaaaKEBH.VcCatTableWeek.WORKDATE1_InputField.0\")"));
    }

    #[test]
    fn set_value_clears_then_dispatches_events() {
        let js = set_value_js("window.document", "field", "8");
        let clear = js.find("el.value = \"\"").expect("clears first");
        let set = js.find("el.value = \"8\"").expect("then sets");
        assert!(clear < set);
        assert!(js.contains("new Event(\"input\""));
        assert!(js.contains("new Event(\"change\""));
    }
}
