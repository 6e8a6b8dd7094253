use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, MouseEvent,
    MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::keymap;
use crate::log_capture::{self, CapturedLog};
use crate::project::LoadedConfig;
use crate::state::PreviewState;
use crate::ui;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const EVENT_POLL: Duration = Duration::from_millis(100);
/// Wheel `deltaY` per terminal scroll notch, in pixels.
const SCROLL_NOTCH: f32 = 100.0;

pub async fn run(loaded: LoadedConfig) -> anyhow::Result<()> {
    let mut logs = log_capture::install_channel()?;
    log::info!("Config loaded from {}", loaded.source);

    let reports_release = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
    if !reports_release {
        log::warn!("Terminal does not report key releases; keys are held while repeating");
    }

    let mut terminal = ratatui::init();
    let result = match TerminalModes::enable(stdout(), reports_release) {
        Ok(_modes) => {
            let mut state = PreviewState::new(loaded.config, reports_release);
            event_loop(&mut terminal, &mut state, &mut logs).await
        }
        Err(e) => Err(e.into()),
    };
    ratatui::restore();
    result
}

/// Mouse capture, focus reporting and key-release reporting for the
/// session. Dropping switches off whatever was switched on, including after
/// a failed `enable`.
struct TerminalModes<W: Write> {
    out: W,
    keyboard_flags: bool,
}

impl<W: Write> TerminalModes<W> {
    fn enable(out: W, reports_release: bool) -> io::Result<Self> {
        let mut modes = Self {
            out,
            keyboard_flags: false,
        };
        execute!(modes.out, EnableMouseCapture, EnableFocusChange)?;
        if reports_release {
            modes.keyboard_flags = true;
            execute!(
                modes.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(modes)
    }
}

impl<W: Write> Drop for TerminalModes<W> {
    fn drop(&mut self) {
        if self.keyboard_flags {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.out, DisableMouseCapture, DisableFocusChange);
    }
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut PreviewState,
    logs: &mut mpsc::UnboundedReceiver<CapturedLog>,
) -> anyhow::Result<()> {
    let (tx, mut events) = mpsc::unbounded_channel();
    let reader = tokio::task::spawn_blocking(move || forward_events(tx));

    let clock = Instant::now();
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    while !state.should_quit {
        tokio::select! {
            _ = ticker.tick() => {
                state.tick(elapsed_ms(clock));
                while let Ok(entry) = logs.try_recv() {
                    state.log.push(entry.level, entry.message);
                }
                terminal.draw(|frame| ui::render(frame, state))?;
            }
            event = events.recv() => {
                handle_event(state, event, elapsed_ms(clock));
            }
        }
    }

    drop(events);
    reader.await?;
    Ok(())
}

/// Blocking crossterm reader. Exits once the receiver is dropped.
fn forward_events(tx: mpsc::UnboundedSender<Event>) {
    while !tx.is_closed() {
        match event::poll(EVENT_POLL) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("Terminal read failed: {e}");
                    return;
                }
            },
            Ok(false) => {}
            Err(e) => {
                log::error!("Terminal poll failed: {e}");
                return;
            }
        }
    }
}

fn elapsed_ms(clock: Instant) -> f64 {
    clock.elapsed().as_secs_f64() * 1000.0
}

/// `None` means the reader task has stopped; with no way to read Esc the
/// session ends.
fn handle_event(state: &mut PreviewState, event: Option<Event>, now_ms: f64) {
    match event {
        Some(Event::Key(key)) => handle_key(state, key, now_ms),
        Some(Event::Mouse(mouse)) => handle_mouse(state, mouse, now_ms),
        Some(Event::FocusLost) => state.input.release_all(),
        Some(_) => {}
        None => {
            log::warn!("Terminal input closed, leaving preview");
            state.should_quit = true;
        }
    }
}

fn handle_key(state: &mut PreviewState, key: KeyEvent, now_ms: f64) {
    if key.kind == KeyEventKind::Release {
        if let Some(code) = keymap::dom_code(key.code) {
            state.key_released(&code);
        }
        return;
    }

    // Preview controls take precedence over bindings.
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            state.should_quit = true;
            return;
        }
        (KeyCode::F(1), _) => {
            state.show_help = !state.show_help;
            return;
        }
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
            state.log.clear();
            return;
        }
        (KeyCode::Home, _) => {
            state.reset_camera();
            return;
        }
        (KeyCode::PageUp, KeyModifiers::SHIFT) => {
            state.log.scroll_up(5);
            return;
        }
        (KeyCode::PageDown, KeyModifiers::SHIFT) => {
            state.log.scroll_down(5);
            return;
        }
        _ => {}
    }

    if let Some(code) = keymap::dom_code(key.code) {
        state.key_pressed(&code, keymap::modifiers(key.modifiers), now_ms);
    }
}

fn handle_mouse(state: &mut PreviewState, mouse: MouseEvent, now_ms: f64) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            state.mouse_at(mouse.column, mouse.row, now_ms);
        }
        MouseEventKind::ScrollUp => state.scroll(-SCROLL_NOTCH),
        MouseEventKind::ScrollDown => state.scroll(SCROLL_NOTCH),
        _ => {}
    }
}
