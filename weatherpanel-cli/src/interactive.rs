use std::{collections::VecDeque, io::Write};

use anyhow::{Context, Result};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    sync::watch,
};
use weatherpanel_core::{PanelError, PositionProvider, WeatherPanel, WeatherProvider, WeatherResult};

use crate::render;

const QUIT: &str = ":q";

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Panel contents as of the last completed lookup.
struct Frame {
    result: Option<WeatherResult>,
    error: Option<PanelError>,
}

impl Frame {
    fn of<W, P>(panel: &WeatherPanel<W, P>) -> Self
    where
        W: WeatherProvider,
        P: PositionProvider,
    {
        Self { result: panel.result().cloned(), error: panel.error() }
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Session<R, O> {
    clock: watch::Receiver<String>,
    lines: Lines<R>,
    queued: VecDeque<String>,
    input_open: bool,
    out: O,
}

fn is_quit(line: &str) -> bool {
    line.trim() == QUIT
}

fn query_text(line: String) -> String {
    match line.strip_suffix('\r') {
        Some(stripped) => stripped.to_string(),
        None => line,
    }
}

impl<R, O> Session<R, O>
where
    R: AsyncBufRead + Unpin,
    O: Write,
{
    fn draw(&mut self, frame: &Frame) -> Result<()> {
        let local_time = self.clock.borrow_and_update().clone();
        let body = render::panel_text(frame.result.as_ref(), frame.error, &local_time);

        write!(self.out, "{CLEAR_SCREEN}{body}\n\n{}", render::PROMPT).context("Failed to write panel")?;
        self.out.flush().context("Failed to flush output")?;
        Ok(())
    }

    /// Drives `lookup` to completion while `shown` keeps redrawing on every tick.
    /// Lines entered meanwhile are queued; `:q` abandons the lookup.
    async fn lookup<F>(&mut self, lookup: F, shown: &Frame) -> Result<Flow>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(lookup);

        loop {
            tokio::select! {
                () = &mut lookup => return Ok(Flow::Continue),
                changed = self.clock.changed() => {
                    if changed.is_err() {
                        return Ok(Flow::Quit);
                    }
                    self.draw(shown)?;
                }
                line = self.lines.next_line(), if self.input_open => {
                    match line.context("Failed to read input")? {
                        None => self.input_open = false,
                        Some(line) if is_quit(&line) => return Ok(Flow::Quit),
                        Some(line) => self.queued.push_back(query_text(line)),
                    }
                }
            }
        }
    }

    /// Next city to look up, redrawing `frame` on ticks while waiting.
    /// `None` once the user quits or input ends.
    async fn next_query(&mut self, frame: &Frame) -> Result<Option<String>> {
        if let Some(queued) = self.queued.pop_front() {
            return Ok(Some(queued));
        }

        while self.input_open {
            tokio::select! {
                line = self.lines.next_line() => {
                    match line.context("Failed to read input")? {
                        None => self.input_open = false,
                        Some(line) if is_quit(&line) => return Ok(None),
                        Some(line) => return Ok(Some(query_text(line))),
                    }
                }
                changed = self.clock.changed() => {
                    if changed.is_err() {
                        return Ok(None);
                    }
                    self.draw(frame)?;
                }
            }
        }

        Ok(None)
    }
}

/// Runs the live panel until `:q` or end of input. Each line is a city
/// search. The panel (and its clock) is dropped on return.
pub async fn run<W, P, R, O>(mut panel: WeatherPanel<W, P>, input: R, out: O) -> Result<()>
where
    W: WeatherProvider,
    P: PositionProvider,
    R: AsyncBufRead + Unpin,
    O: Write,
{
    let mut session = Session {
        clock: panel.subscribe_clock(),
        lines: input.lines(),
        queued: VecDeque::new(),
        input_open: true,
        out,
    };

    let shown = Frame::of(&panel);
    session.draw(&shown)?;
    if let Flow::Quit = session.lookup(panel.mount(), &shown).await? {
        return Ok(());
    }

    loop {
        let frame = Frame::of(&panel);
        session.draw(&frame)?;

        let Some(query) = session.next_query(&frame).await? else {
            break;
        };
        if let Flow::Quit = session.lookup(panel.search(&query), &frame).await? {
            break;
        }
    }

    tracing::debug!("panel closed");
    Ok(())
}
