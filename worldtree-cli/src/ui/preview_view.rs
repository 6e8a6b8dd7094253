use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use worldtree_camera::CameraRig;

use crate::state::PreviewState;

/// Top-down map (world X right, world -Z up) beside a stats panel.
pub fn render(frame: &mut Frame, state: &mut PreviewState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(36)])
        .split(area);

    let map_block = Block::default()
        .borders(Borders::ALL)
        .title(" Map ")
        .border_style(Style::default().fg(Color::Cyan));
    state.map_area = Some(map_block.inner(chunks[0]));

    let bounds = state.controller.config().bounds;
    let anchor = (f64::from(bounds.anchor.x), f64::from(-bounds.anchor.z));
    let radius = f64::from(bounds.max_distance).max(1.0);
    let extent = radius * 1.15;

    let position = state.camera.position;
    let eye = (f64::from(position.x), f64::from(-position.z));
    let forward = state.camera.forward();
    let heading = (
        eye.0 + f64::from(forward.x) * radius * 0.12,
        eye.1 - f64::from(forward.z) * radius * 0.12,
    );
    let camera_color = if state.controller.last_clamp().radial {
        Color::Red
    } else {
        Color::Yellow
    };

    let map = Canvas::default()
        .block(map_block)
        .marker(Marker::Braille)
        .x_bounds([anchor.0 - extent, anchor.0 + extent])
        .y_bounds([anchor.1 - extent, anchor.1 + extent])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: anchor.0,
                y: anchor.1,
                radius,
                color: Color::DarkGray,
            });
            ctx.draw(&Points {
                coords: &[anchor],
                color: Color::Green,
            });
            ctx.draw(&CanvasLine {
                x1: eye.0,
                y1: eye.1,
                x2: heading.0,
                y2: heading.1,
                color: camera_color,
            });
            ctx.draw(&Points {
                coords: &[eye],
                color: camera_color,
            });
        });
    frame.render_widget(map, chunks[0]);

    render_stats(frame, state, chunks[1]);
}

fn render_stats(frame: &mut Frame, state: &PreviewState, area: Rect) {
    let k = state.controller.kinematics();
    let clamp = state.controller.last_clamp();
    let snapshot = state.last_snapshot();
    let activation = state.input.activation();

    let mut held: Vec<&str> = snapshot.keys_down.iter().map(String::as_str).collect();
    held.sort_unstable();

    let look_style = if activation.is_active() {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::Yellow).bold()
    };
    let flag = |on: bool| {
        if on {
            Span::styled("hit", Style::default().fg(Color::Red).bold())
        } else {
            Span::styled("-", Style::default().fg(Color::DarkGray))
        }
    };

    let mut lines = vec![
        Line::styled("Free Camera", Style::default().bold().fg(Color::Cyan)),
        Line::raw(""),
        Line::raw(format!(
            "pos  {:>7.2} {:>7.2} {:>7.2}",
            k.position.x, k.position.y, k.position.z
        )),
        Line::raw(format!(
            "vel  {:>7.3} {:>7.3} {:>7.3}",
            k.velocity.x, k.velocity.y, k.velocity.z
        )),
        Line::raw(format!(
            "yaw  {:>7.1}°  pitch {:>6.1}°",
            k.yaw.to_degrees(),
            k.pitch.to_degrees()
        )),
        Line::raw(""),
        Line::from(vec![
            Span::raw("look    "),
            Span::styled(activation.label(), look_style),
        ]),
        Line::raw(format!(
            "pointer {}",
            if state.pointer_inside() { "inside" } else { "outside" }
        )),
        Line::raw(format!("keys    {}", held.join(" "))),
        Line::from(vec![
            Span::raw("clamp   h "),
            flag(clamp.height),
            Span::raw("  r "),
            flag(clamp.radial),
            Span::raw("  p "),
            flag(clamp.pitch),
        ]),
        Line::raw(format!("frame   {}", state.frame_count)),
    ];

    if state.show_help {
        lines.extend([
            Line::raw(""),
            Line::raw("[WASD/Arrows] Move"),
            Line::raw("[E/Space Q/C] Up/Down"),
            Line::raw("[Mouse] Look  [Wheel] Rise"),
            Line::raw("[Home] Reset"),
            Line::raw("[Shift+PgUp/PgDn] Scroll log"),
            Line::raw("[Ctrl-L] Clear log"),
            Line::raw("[Esc/Ctrl-C] Quit"),
        ]);
    } else {
        lines.extend([Line::raw(""), Line::raw("[F1] Help")]);
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Stats ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}
