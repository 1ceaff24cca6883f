//! Playwright session over a Node subprocess.
//!
//! Rather than linking a browser automation library, the session writes
//! a small bootstrap script to a temp file and spawns `node` on it. The
//! script owns one browser page and serves JSON-lines commands on
//! stdin, one reply per line on stdout. Keeping a single long-lived
//! page matters: the workflows under test carry login state across many
//! steps.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tracing::{debug, info, trace, warn};

use async_trait::async_trait;

use crate::config::SuiteConfig;
use crate::driver::{Driver, WaitState};
use crate::error::{SuiteError, SuiteResult};
use crate::locator::Locator;

/// Commands understood by the bootstrap script.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Command<'a> {
    Goto { url: &'a str },
    Click { locator: &'a Locator, force: bool },
    Fill { locator: &'a Locator, value: &'a str },
    TypeText { locator: &'a Locator, value: &'a str },
    Press { locator: &'a Locator, key: &'a str },
    Key { key: &'a str },
    Mouse { x: f64, y: f64 },
    Text { locator: &'a Locator },
    Value { locator: &'a Locator },
    Attr { locator: &'a Locator, name: &'a str },
    Wait {
        locator: &'a Locator,
        state: WaitState,
        timeout_ms: u64,
    },
    Enabled { locator: &'a Locator },
    Count { locator: &'a Locator },
    SetFiles { locator: &'a Locator, path: &'a str },
    Eval { script: &'a str },
    Download { locator: &'a Locator },
    Screenshot { path: &'a str },
    Close,
}

#[derive(Serialize)]
struct Envelope<'a> {
    id: u64,
    #[serde(flatten)]
    cmd: &'a Command<'a>,
}

#[derive(Debug, Deserialize)]
struct Reply {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

const BOOTSTRAP_JS: &str = r#"
const readline = require('readline');
const { chromium, firefox, webkit } = require('playwright');

const [browserName, headless, width, height, timeoutMs] = process.argv.slice(2);

function locate(scope, l) {
  if (l.parent) scope = locate(scope, l.parent);
  let loc;
  switch (l.by) {
    case 'role':
      if (l.name) {
        const name = l.regex ? new RegExp(l.name, 'i') : l.name;
        loc = scope.getByRole(l.role, { name, exact: !!l.exact });
      } else {
        loc = scope.getByRole(l.role);
      }
      break;
    case 'css': loc = scope.locator(l.css); break;
    case 'text': loc = scope.getByText(l.text); break;
    case 'placeholder': loc = scope.getByPlaceholder(l.placeholder); break;
    case 'label': loc = scope.getByLabel(l.label); break;
    default: throw new Error('unknown selector: ' + l.by);
  }
  if (l.has_text) loc = loc.filter({ hasText: l.has_text });
  if (l.pick === 'first') loc = loc.first();
  else if (l.pick === 'last') loc = loc.last();
  else if (l.pick && typeof l.pick.index === 'number') loc = loc.nth(l.pick.index);
  return loc;
}

(async () => {
  const engines = { chromium, firefox, webkit };
  const browser = await engines[browserName].launch({ headless: headless === 'true' });
  const context = await browser.newContext({
    viewport: { width: Number(width), height: Number(height) },
  });
  const page = await context.newPage();
  page.setDefaultTimeout(Number(timeoutMs));

  const rl = readline.createInterface({ input: process.stdin });
  for await (const line of rl) {
    if (!line.trim()) continue;
    const cmd = JSON.parse(line);
    let reply = { id: cmd.id, ok: true };
    try {
      switch (cmd.op) {
        case 'goto': await page.goto(cmd.url, { waitUntil: 'load' }); break;
        case 'click': await locate(page, cmd.locator).click({ force: !!cmd.force }); break;
        case 'fill': await locate(page, cmd.locator).fill(cmd.value); break;
        case 'type_text': await locate(page, cmd.locator).pressSequentially(cmd.value); break;
        case 'press': await locate(page, cmd.locator).press(cmd.key); break;
        case 'key': await page.keyboard.press(cmd.key); break;
        case 'mouse': await page.mouse.click(cmd.x, cmd.y); break;
        case 'text': reply.value = await locate(page, cmd.locator).innerText(); break;
        case 'value': reply.value = await locate(page, cmd.locator).inputValue(); break;
        case 'attr': reply.value = await locate(page, cmd.locator).getAttribute(cmd.name); break;
        case 'wait':
          await locate(page, cmd.locator).waitFor({ state: cmd.state, timeout: cmd.timeout_ms });
          break;
        case 'enabled': reply.value = await locate(page, cmd.locator).isEnabled(); break;
        case 'count': reply.value = await locate(page, cmd.locator).count(); break;
        case 'set_files': await locate(page, cmd.locator).setInputFiles(cmd.path); break;
        case 'eval': reply.value = await page.evaluate(cmd.script); break;
        case 'download': {
          const pending = page.waitForEvent('download');
          await locate(page, cmd.locator).click();
          const download = await pending;
          reply.value = download.suggestedFilename();
          break;
        }
        case 'screenshot': await page.screenshot({ path: cmd.path, fullPage: true }); break;
        case 'close':
          await browser.close();
          console.log(JSON.stringify(reply));
          process.exit(0);
        default: throw new Error('unknown op: ' + cmd.op);
      }
    } catch (err) {
      reply = { id: cmd.id, ok: false, error: String((err && err.message) || err) };
    }
    console.log(JSON.stringify(reply));
  }
  await browser.close();
})().catch((err) => {
  console.error(String(err));
  process.exit(1);
});
"#;

/// Check that Playwright is available through npx.
pub async fn check_playwright_installed() -> SuiteResult<()> {
    let output = tokio::process::Command::new("npx")
        .args(["playwright", "--version"])
        .output()
        .await
        .map_err(|_| SuiteError::PlaywrightNotFound)?;
    if !output.status.success() {
        return Err(SuiteError::PlaywrightNotFound);
    }
    let version = String::from_utf8_lossy(&output.stdout);
    debug!("found {}", version.trim());
    Ok(())
}

/// Probe the base URL until it answers, with bounded retries.
///
/// Any HTTP response counts as reachable; the suite asserts page
/// behaviour, not status codes.
pub async fn wait_for_reachable(url: &str, attempts: usize) -> SuiteResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let mut last = String::new();
    for attempt in 1..=attempts {
        match client.get(url).send().await {
            Ok(resp) => {
                debug!("{url} reachable ({})", resp.status());
                return Ok(());
            }
            Err(err) => {
                trace!("probe {attempt}/{attempts} failed: {err}");
                last = err.to_string();
            }
        }
        if attempt < attempts {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
    Err(SuiteError::Unreachable {
        url: url.to_string(),
        attempts,
        last,
    })
}

/// A live browser page behind the Node driver subprocess.
pub struct PlaywrightSession {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
    // Keeps the bootstrap script alive for the subprocess lifetime.
    _script: NamedTempFile,
}

impl PlaywrightSession {
    /// Verify the toolchain, probe the target, launch the browser.
    pub async fn launch(config: &SuiteConfig) -> SuiteResult<Self> {
        check_playwright_installed().await?;
        wait_for_reachable(&config.base_url, 10).await?;

        let script = NamedTempFile::with_prefix("civiport-driver-")?;
        std::fs::write(script.path(), BOOTSTRAP_JS)?;

        info!(
            "launching {} (headless={})",
            config.browser, config.headless
        );
        let mut child = tokio::process::Command::new("node")
            .arg(script.path())
            .arg(config.browser.as_str())
            .arg(config.headless.to_string())
            .arg(config.viewport.width.to_string())
            .arg(config.viewport.height.to_string())
            .arg(config.default_timeout_ms.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SuiteError::DriverStartup(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SuiteError::DriverStartup("no stdin pipe".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SuiteError::DriverStartup("no stdout pipe".to_string()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 0,
            _script: script,
        })
    }

    async fn send(&mut self, cmd: Command<'_>) -> SuiteResult<Value> {
        self.next_id += 1;
        let id = self.next_id;
        let line = serde_json::to_string(&Envelope { id, cmd: &cmd })?;
        trace!("-> {line}");
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;

        loop {
            let line = self
                .stdout
                .next_line()
                .await?
                .ok_or_else(|| SuiteError::Protocol("driver closed its stdout".to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            trace!("<- {line}");
            let reply: Reply = serde_json::from_str(&line)
                .map_err(|e| SuiteError::Protocol(format!("bad reply {line:?}: {e}")))?;
            if reply.id != id {
                warn!("out-of-order reply for id {}", reply.id);
                continue;
            }
            if reply.ok {
                return Ok(reply.value);
            }
            return Err(SuiteError::Protocol(
                reply.error.unwrap_or_else(|| "unknown driver error".to_string()),
            ));
        }
    }

    /// Graceful shutdown: close command, then SIGTERM, then kill.
    pub async fn shutdown(mut self) -> SuiteResult<()> {
        let _ = self.send(Command::Close).await;
        match tokio::time::timeout(Duration::from_secs(5), self.child.wait()).await {
            Ok(_) => return Ok(()),
            Err(_) => debug!("driver did not exit on close, sending SIGTERM"),
        }
        if let Some(pid) = self.child.id() {
            let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
        if tokio::time::timeout(Duration::from_secs(5), self.child.wait())
            .await
            .is_err()
        {
            warn!("driver ignored SIGTERM, killing");
            self.child.kill().await?;
        }
        Ok(())
    }
}

impl Drop for PlaywrightSession {
    fn drop(&mut self) {
        // kill_on_drop finishes the job if the process ignores this.
        if let Some(pid) = self.child.id() {
            let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
    }
}

fn interaction(action: &'static str, locator: &Locator, err: SuiteError) -> SuiteError {
    match err {
        e @ SuiteError::Io(_) => e,
        e => SuiteError::Interaction {
            action,
            locator: locator.to_string(),
            reason: e.to_string(),
        },
    }
}

#[async_trait]
impl Driver for PlaywrightSession {
    async fn goto(&mut self, url: &str) -> SuiteResult<()> {
        self.send(Command::Goto { url }).await.map(|_| ())
    }

    async fn click(&mut self, locator: &Locator) -> SuiteResult<()> {
        self.send(Command::Click {
            locator,
            force: false,
        })
        .await
        .map(|_| ())
        .map_err(|e| interaction("click", locator, e))
    }

    async fn force_click(&mut self, locator: &Locator) -> SuiteResult<()> {
        self.send(Command::Click {
            locator,
            force: true,
        })
        .await
        .map(|_| ())
        .map_err(|e| interaction("click", locator, e))
    }

    async fn fill(&mut self, locator: &Locator, value: &str) -> SuiteResult<()> {
        self.send(Command::Fill { locator, value })
            .await
            .map(|_| ())
            .map_err(|e| interaction("fill", locator, e))
    }

    async fn type_text(&mut self, locator: &Locator, value: &str) -> SuiteResult<()> {
        self.send(Command::TypeText { locator, value })
            .await
            .map(|_| ())
            .map_err(|e| interaction("type", locator, e))
    }

    async fn press(&mut self, locator: &Locator, key: &str) -> SuiteResult<()> {
        self.send(Command::Press { locator, key })
            .await
            .map(|_| ())
            .map_err(|e| interaction("press", locator, e))
    }

    async fn press_page_key(&mut self, key: &str) -> SuiteResult<()> {
        self.send(Command::Key { key }).await.map(|_| ())
    }

    async fn mouse_click(&mut self, x: f64, y: f64) -> SuiteResult<()> {
        self.send(Command::Mouse { x, y }).await.map(|_| ())
    }

    async fn inner_text(&mut self, locator: &Locator) -> SuiteResult<String> {
        let value = self
            .send(Command::Text { locator })
            .await
            .map_err(|e| interaction("inner_text", locator, e))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn input_value(&mut self, locator: &Locator) -> SuiteResult<String> {
        let value = self
            .send(Command::Value { locator })
            .await
            .map_err(|e| interaction("input_value", locator, e))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn get_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
    ) -> SuiteResult<Option<String>> {
        let value = self
            .send(Command::Attr { locator, name })
            .await
            .map_err(|e| interaction("get_attribute", locator, e))?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn wait_for(
        &mut self,
        locator: &Locator,
        state: WaitState,
        timeout_ms: u64,
    ) -> SuiteResult<()> {
        self.send(Command::Wait {
            locator,
            state,
            timeout_ms,
        })
        .await
        .map(|_| ())
        .map_err(|e| interaction("wait_for", locator, e))
    }

    async fn is_enabled(&mut self, locator: &Locator) -> SuiteResult<bool> {
        let value = self
            .send(Command::Enabled { locator })
            .await
            .map_err(|e| interaction("is_enabled", locator, e))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn count(&mut self, locator: &Locator) -> SuiteResult<usize> {
        let value = self
            .send(Command::Count { locator })
            .await
            .map_err(|e| interaction("count", locator, e))?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn set_input_files(&mut self, locator: &Locator, path: &Path) -> SuiteResult<()> {
        let path = path.display().to_string();
        self.send(Command::SetFiles {
            locator,
            path: &path,
        })
        .await
        .map(|_| ())
        .map_err(|e| interaction("set_input_files", locator, e))
    }

    async fn evaluate(&mut self, script: &str) -> SuiteResult<Value> {
        self.send(Command::Eval { script }).await
    }

    async fn download_via(&mut self, trigger: &Locator) -> SuiteResult<()> {
        let name = self
            .send(Command::Download { locator: trigger })
            .await
            .map_err(|e| interaction("download", trigger, e))?;
        debug!("downloaded {}", name.as_str().unwrap_or("<unnamed>"));
        Ok(())
    }

    async fn screenshot(&mut self) -> SuiteResult<Vec<u8>> {
        let file = NamedTempFile::with_prefix("civiport-shot-")?;
        let path = file.path().display().to_string();
        self.send(Command::Screenshot { path: &path }).await?;
        Ok(std::fs::read(file.path())?)
    }
}
