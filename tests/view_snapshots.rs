//! Snapshot tests for the terminal rasterizer
//!
//! Uses insta + a ratatui Buffer to verify how draw operations land on
//! terminal cells, and that a fully driven row renders into a TestBackend.

use dialog_row::controller::{ManualClock, RowController};
use dialog_row::gesture::RecordingHaptics;
use dialog_row::layout::{LayoutEngine, MonospaceMeasurer, Rect, RowMetrics, TextStyle};
use dialog_row::model::{RowId, RowState};
use dialog_row::render::{Canvas, Color, DrawOp, IconKind, TextAlign};
use dialog_row::view::{TerminalCanvas, CELL_WIDTH_PX};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::Terminal;
use std::rc::Rc;

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Empty trailing lines are removed to keep snapshots clean.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

fn text(rect: Rect, text: &str, align: TextAlign, alpha: f32) -> DrawOp {
    DrawOp::Text {
        rect,
        text: text.to_string(),
        style: TextStyle::Title,
        color: Color::rgb(0xee, 0xee, 0xee),
        alpha,
        scale: 1.0,
        align,
        clip: None,
    }
}

fn icon(kind: IconKind, rect: Rect) -> DrawOp {
    DrawOp::Icon {
        kind,
        rect,
        color: Color::rgb(0x99, 0x99, 0x99),
        alpha: 1.0,
        scale: 1.0,
        clip: None,
    }
}

// ===== Rasterizer Snapshots =====

#[test]
fn snapshot_text_and_icons_snap_to_cells() {
    let area = CellRect::new(0, 0, 12, 2);
    let mut buffer = Buffer::empty(area);
    {
        let mut canvas = TerminalCanvas::new(&mut buffer, area);
        assert_eq!(canvas.width_px(), 12.0 * CELL_WIDTH_PX);

        let line = Rect::new(0.0, 0.0, 96.0, 18.0);
        canvas.draw(&text(line, "Alice", TextAlign::Left, 1.0));
        canvas.draw(&text(line, "12:30", TextAlign::Right, 1.0));
        canvas.draw(&icon(IconKind::Mute, Rect::new(40.0, 18.0, 16.0, 18.0)));
        canvas.draw(&icon(IconKind::Pin, Rect::new(88.0, 18.0, 8.0, 18.0)));
        // Too faint for a cell to show.
        canvas.draw(&text(Rect::new(0.0, 18.0, 96.0, 18.0), "hidden", TextAlign::Left, 0.2));
    }

    insta::assert_snapshot!(buffer_to_string(&buffer), @r"
    Alice  12:30
          ∅    ⊙
    ");
}

// ===== Full Row Rendering =====

#[test]
fn bound_row_renders_title_timestamp_and_preview() {
    let clock = Rc::new(ManualClock::new(0));
    let engine = LayoutEngine::new(Rc::new(MonospaceMeasurer::new(CELL_WIDTH_PX)), RowMetrics::default());
    let mut controller = RowController::new(engine, clock, Rc::new(RecordingHaptics::new()));
    controller.bind(RowState {
        title: "Alice".to_string(),
        preview: "See you tomorrow".to_string(),
        timestamp_label: "12:30".to_string(),
        ..RowState::new(RowId::new(1))
    });

    let mut terminal = Terminal::new(TestBackend::new(50, 5)).expect("terminal");
    terminal
        .draw(|frame| {
            let area = frame.area();
            let mut canvas = TerminalCanvas::new(frame.buffer_mut(), area);
            controller.measure(canvas.width_px());
            controller.draw(&mut canvas, 0.0, 0.0);
        })
        .expect("draw");

    let output = buffer_to_string(terminal.backend().buffer());
    assert!(output.contains("Alice"), "title missing:\n{output}");
    assert!(output.contains("12:30"), "timestamp missing:\n{output}");
    assert!(output.contains("See you tomorrow"), "preview missing:\n{output}");
}
