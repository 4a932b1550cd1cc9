//! Playwright browser automation
//!
//! Playwright is driven through a small Node.js bridge: the script below is
//! written to a temp dir, started with `node`, and fed one JSON request per
//! line on stdin. Every reply comes back as one JSON line on stdout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::protocol::{Command as BridgeCommand, Reply, Request};
use crate::selectors::Locator;
use crate::session::{BrowserSession, Observed, Probe, SelectBy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    /// Node.js executable
    pub node: PathBuf,
    /// Directory `playwright` is resolved from (its `node_modules`)
    pub working_dir: PathBuf,
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Bound on starting the browser itself
    pub launch_timeout: Duration,
    /// Slack added on top of each operation's own timeout before the bridge
    /// is considered wedged
    pub bridge_grace: Duration,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            node: PathBuf::from("node"),
            working_dir: PathBuf::from("."),
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            launch_timeout: Duration::from_secs(30),
            bridge_grace: Duration::from_secs(5),
        }
    }
}

/// Full-page captures of long tables can be slow
const SCREENSHOT_TIMEOUT: Duration = Duration::from_secs(30);

/// Node.js side of the bridge
pub const BRIDGE_SCRIPT: &str = r#"
const readline = require('readline');

let playwright;
try {
  playwright = require(require.resolve('playwright', { paths: [process.cwd()] }));
} catch (_) {
  playwright = require('playwright');
}

let browser = null;
let page = null;

function send(obj, done) {
  process.stdout.write(JSON.stringify(obj) + '\n', done);
}

async function single(selector) {
  const loc = page.locator(selector);
  const n = await loc.count();
  if (n === 0) return null;
  if (n > 1) throw new Error(`strict mode violation: "${selector}" resolved to ${n} elements`);
  return loc;
}

async function probe(selector, p) {
  if (p.kind === 'count') return await page.locator(selector).count();
  const el = await single(selector);
  switch (p.kind) {
    case 'visible': return el ? await el.isVisible() : false;
    case 'enabled': return el ? await el.isEnabled() : null;
    case 'attribute': return el ? await el.getAttribute(p.name) : null;
    case 'value': return el ? await el.inputValue() : null;
    case 'text': return el ? await el.textContent() : null;
    default: throw new Error(`unknown probe: ${p.kind}`);
  }
}

async function handle(req) {
  switch (req.op) {
    case 'launch': {
      browser = await playwright[req.browser].launch({ headless: req.headless });
      const context = await browser.newContext({ viewport: { width: req.width, height: req.height } });
      page = await context.newPage();
      return null;
    }
    case 'goto':
      await page.goto(req.url, { waitUntil: req.wait_until, timeout: req.timeout_ms });
      return null;
    case 'evaluate': {
      const value = await page.evaluate(req.expression);
      return value === undefined ? null : value;
    }
    case 'click':
      await page.locator(req.selector).click({ timeout: req.timeout_ms });
      return null;
    case 'select': {
      const option = req.choice.label !== undefined ? { label: req.choice.label } : { value: req.choice.value };
      await page.locator(req.selector).selectOption(option, { timeout: req.timeout_ms });
      return null;
    }
    case 'fill':
      await page.locator(req.selector).fill(req.value, { timeout: req.timeout_ms });
      return null;
    case 'probe':
      return await probe(req.selector, req.probe);
    case 'screenshot':
      await page.screenshot({ path: req.path, fullPage: req.full_page });
      return null;
    case 'close':
      if (browser) await browser.close();
      browser = null;
      return null;
    default:
      throw new Error(`unknown op: ${req.op}`);
  }
}

let queue = Promise.resolve();
const rl = readline.createInterface({ input: process.stdin });

rl.on('line', (line) => {
  queue = queue.then(async () => {
    let req;
    try {
      req = JSON.parse(line);
    } catch (e) {
      send({ id: 0, ok: false, error: `invalid request: ${e.message}` });
      return;
    }
    try {
      const value = await handle(req);
      send({ id: req.id, ok: true, value }, req.op === 'close' ? () => process.exit(0) : undefined);
    } catch (e) {
      send({ id: req.id, ok: false, error: String((e && e.message) || e) });
    }
  });
});

rl.on('close', () => {
  queue.then(async () => {
    if (browser) await browser.close();
    process.exit(0);
  });
});
"#;

/// A browser page owned by a running bridge process
pub struct PlaywrightSession {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    writer: BufWriter<ChildStdin>,
    next_id: u64,
    grace: Duration,
    /// Holds the bridge script on disk for the lifetime of the process
    _script_dir: tempfile::TempDir,
}

impl PlaywrightSession {
    /// Start the bridge and launch the browser
    pub async fn launch(config: &PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed(config).await?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("bridge.js");
        std::fs::write(&script_path, BRIDGE_SCRIPT)?;

        debug!("Starting Playwright bridge: {}", script_path.display());

        let mut child = Command::new(&config.node)
            .arg(&script_path)
            .current_dir(&config.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                E2eError::Bridge(format!("Failed to spawn {}: {}", config.node.display(), e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Bridge("Failed to get bridge stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Bridge("Failed to get bridge stdout".to_string()))?;

        let mut session = Self {
            child,
            lines: BufReader::new(stdout).lines(),
            writer: BufWriter::new(stdin),
            next_id: 1,
            grace: config.bridge_grace,
            _script_dir: script_dir,
        };

        session
            .request(
                BridgeCommand::Launch {
                    browser: config.browser.as_str().to_string(),
                    headless: config.headless,
                    width: config.viewport_width,
                    height: config.viewport_height,
                },
                config.launch_timeout,
            )
            .await?;

        info!(
            "Launched {} (headless: {})",
            config.browser.as_str(),
            config.headless
        );
        Ok(session)
    }

    /// Check that `playwright` resolves from the working directory
    async fn check_playwright_installed(config: &PlaywrightConfig) -> E2eResult<()> {
        let status = Command::new(&config.node)
            .args([
                "-e",
                "require.resolve('playwright', { paths: [process.cwd()] })",
            ])
            .current_dir(&config.working_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Send one command and wait for its reply. `timeout` is the operation's
    /// own budget; the bridge gets `grace` on top of it to answer.
    async fn request(
        &mut self,
        command: BridgeCommand,
        timeout: Duration,
    ) -> E2eResult<serde_json::Value> {
        let id = self.next_id;
        self.next_id += 1;
        let op = command.op();

        let json = serde_json::to_string(&Request { id, command })?;
        debug!("bridge >>> {}", json);

        let limit = timeout + self.grace;
        match tokio::time::timeout(limit, self.exchange(id, &json)).await {
            Ok(reply) => {
                let reply = reply?;
                if reply.ok {
                    Ok(reply.value)
                } else {
                    Err(E2eError::Playwright(
                        reply
                            .error
                            .unwrap_or_else(|| format!("{} failed", op)),
                    ))
                }
            }
            Err(_) => Err(E2eError::Bridge(format!(
                "no reply to '{}' within {}ms",
                op,
                limit.as_millis()
            ))),
        }
    }

    async fn exchange(&mut self, id: u64, json: &str) -> E2eResult<Reply> {
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        loop {
            let line = self
                .lines
                .next_line()
                .await?
                .ok_or(E2eError::BridgeClosed)?;
            debug!("bridge <<< {}", line);

            let reply: Reply = match serde_json::from_str(&line) {
                Ok(reply) => reply,
                Err(_) => {
                    warn!("Ignoring non-protocol bridge output: {}", line);
                    continue;
                }
            };

            if reply.id == id {
                return Ok(reply);
            }
            warn!("Dropping stale bridge reply {} (waiting for {})", reply.id, id);
        }
    }

    fn timeout_ms(timeout: Duration) -> u64 {
        timeout.as_millis() as u64
    }
}

#[async_trait]
impl BrowserSession for PlaywrightSession {
    async fn goto(&mut self, url: &str, timeout: Duration) -> E2eResult<()> {
        self.request(
            BridgeCommand::Goto {
                url: url.to_string(),
                wait_until: "networkidle".to_string(),
                timeout_ms: Self::timeout_ms(timeout),
            },
            timeout,
        )
        .await?;
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> E2eResult<serde_json::Value> {
        self.request(
            BridgeCommand::Evaluate {
                expression: expression.to_string(),
            },
            Duration::ZERO,
        )
        .await
    }

    async fn click(&mut self, locator: &Locator, timeout: Duration) -> E2eResult<()> {
        self.request(
            BridgeCommand::Click {
                selector: locator.to_string(),
                timeout_ms: Self::timeout_ms(timeout),
            },
            timeout,
        )
        .await?;
        Ok(())
    }

    async fn select_option(
        &mut self,
        locator: &Locator,
        choice: &SelectBy,
        timeout: Duration,
    ) -> E2eResult<()> {
        self.request(
            BridgeCommand::Select {
                selector: locator.to_string(),
                choice: choice.clone(),
                timeout_ms: Self::timeout_ms(timeout),
            },
            timeout,
        )
        .await?;
        Ok(())
    }

    async fn fill(&mut self, locator: &Locator, value: &str, timeout: Duration) -> E2eResult<()> {
        self.request(
            BridgeCommand::Fill {
                selector: locator.to_string(),
                value: value.to_string(),
                timeout_ms: Self::timeout_ms(timeout),
            },
            timeout,
        )
        .await?;
        Ok(())
    }

    async fn probe(&mut self, locator: &Locator, probe: &Probe) -> E2eResult<Observed> {
        let value = self
            .request(
                BridgeCommand::Probe {
                    selector: locator.to_string(),
                    probe: probe.clone(),
                },
                Duration::ZERO,
            )
            .await?;
        Ok(Observed::from_json(&value))
    }

    async fn screenshot(&mut self, path: &Path, full_page: bool) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let path = std::path::absolute(path)?;

        self.request(
            BridgeCommand::Screenshot {
                path: path.to_string_lossy().to_string(),
                full_page,
            },
            SCREENSHOT_TIMEOUT,
        )
        .await?;
        Ok(())
    }

    async fn close(mut self) -> E2eResult<()> {
        let closed = self.request(BridgeCommand::Close, Duration::ZERO).await;

        match tokio::time::timeout(self.grace, self.child.wait()).await {
            Ok(Ok(status)) => debug!("Bridge exited with {}", status),
            _ => {
                warn!("Bridge did not exit after close, killing it");
                let _ = self.child.kill().await;
            }
        }

        closed.map(|_| ())
    }
}
