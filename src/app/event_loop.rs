use std::io::stdout;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};

use super::input::handle_event;

impl App {
    /// Run the pager until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized or the event
    /// loop hits an I/O failure.
    pub fn run(&self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");
        let mut terminal =
            ratatui::try_init().context("failed to initialize terminal; incipit needs a TTY")?;
        let result = execute!(stdout(), EnableMouseCapture)
            .context("failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal));

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        result
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut model = Model::new(self.display_name(), self.source.clone(), self.theme);
        let mut frame_idx: u64 = 0;

        // First frame shows the loading view, then the real size arrives.
        Self::draw(terminal, &model, &mut frame_idx)?;
        let size = terminal.size().context("failed to query terminal size")?;
        model = update(model, Message::Resize(size.width, size.height));

        while !model.should_quit {
            Self::draw(terminal, &model, &mut frame_idx)?;

            let event = event::read().context("failed to read terminal event")?;
            if let Some(msg) = handle_event(&event, &model) {
                if crate::perf::is_debug_log_enabled() {
                    crate::perf::log_event("event.message", format!("frame={frame_idx} msg={msg:?}"));
                }
                model = update(model, msg);
            }
        }
        Ok(())
    }

    fn draw(terminal: &mut DefaultTerminal, model: &Model, frame_idx: &mut u64) -> Result<()> {
        *frame_idx += 1;
        let draw_start = Instant::now();
        terminal
            .draw(|frame| crate::ui::render(model, frame))
            .context("failed to draw frame")?;
        crate::perf::log_event(
            "frame.draw",
            format!(
                "frame={} draw_ms={:.3} offset={}",
                frame_idx,
                draw_start.elapsed().as_secs_f64() * 1000.0,
                model.viewport.offset()
            ),
        );
        Ok(())
    }
}
