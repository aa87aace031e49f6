mod render;
mod settings;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use lumina_config::Config;
use lumina_engine::geometry::resolve_crop_frame;
use lumina_engine::{
    Change, Editor, EditorError, EditorSettings, InteractionController, Layer, LayerKind,
    LayerPatch, Modifiers, NumericField, Renderer, ZOrder,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use render::{CELL_SIZE, CellRenderer};
use std::{env, fs::OpenOptions, io::stdout, path::Path, process};

/// Canvas units moved by one arrow key press
const NUDGE_STEP: f64 = 10.0;

/// Handle pick radius in screen pixels; a terminal mouse only resolves whole
/// cells
const CELL_HANDLE_TOLERANCE: f64 = CELL_SIZE.width;

enum InputMode {
    Normal,
    /// Typing `<field> <value>` for the selected layer
    FieldEdit(String),
}

struct App {
    editor: Editor,
    controller: InteractionController,
    renderer: CellRenderer,
    layer_list_state: ListState,
    input_mode: InputMode,
    status: String,
    /// Inner area of the canvas panel as last drawn
    canvas_area: Rect,
    placeholders: usize,
}

impl App {
    fn new(settings: EditorSettings, images: &[String]) -> Self {
        let mut app = Self {
            editor: Editor::new(settings),
            controller: InteractionController::with_handle_tolerance(CELL_HANDLE_TOLERANCE),
            renderer: CellRenderer::default(),
            layer_list_state: ListState::default(),
            input_mode: InputMode::Normal,
            status: String::from("Ready"),
            canvas_area: Rect::default(),
            placeholders: 0,
        };

        for source in images {
            app.editor.add_image(source.as_str(), None);
        }
        if !images.is_empty() {
            app.status = format!("Opened {} image(s)", images.len());
        }
        app.sync_list_selection();
        app
    }

    /// Returns `true` when the user asked to quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let InputMode::FieldEdit(buffer) = &mut self.input_mode {
            match key.code {
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Enter => {
                    let input = std::mem::take(buffer);
                    self.input_mode = InputMode::Normal;
                    self.submit_field_edit(&input);
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            }
            return false;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('z') => {
                    let change = self.editor.undo();
                    self.note("Undo", change);
                }
                KeyCode::Char('y') | KeyCode::Char('Z') => {
                    let change = self.editor.redo();
                    self.note("Redo", change);
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('t') => {
                let change = self.editor.add_text("New Text");
                self.note("Added text", change);
            }
            KeyCode::Char('i') => {
                self.placeholders += 1;
                let source = format!("placeholder-{}.png", self.placeholders);
                let change = self.editor.add_image(source, None);
                self.note("Added image", change);
            }
            KeyCode::Delete | KeyCode::Backspace => {
                let change = self.editor.delete_selected();
                self.note("Deleted", change);
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.editor.selection() {
                    let change = self.editor.duplicate_layer(id);
                    self.note("Duplicated", change);
                }
            }
            KeyCode::Char(']') => self.reorder("Moved up", ZOrder::Up),
            KeyCode::Char('[') => self.reorder("Moved down", ZOrder::Down),
            KeyCode::Char('}') => self.reorder("Brought to front", ZOrder::Front),
            KeyCode::Char('{') => self.reorder("Sent to back", ZOrder::Back),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let zoom = self.editor.zoom_in();
                self.status = format!("Zoom {:.0}%", zoom * 100.0);
            }
            KeyCode::Char('-') => {
                let zoom = self.editor.zoom_out();
                self.status = format!("Zoom {:.0}%", zoom * 100.0);
            }
            KeyCode::Char('g') => {
                let shown = self.editor.toggle_grid();
                self.status = format!("Grid {}", if shown { "on" } else { "off" });
            }
            KeyCode::Char('l') => self.toggle_flag("Lock", |layer| LayerPatch {
                locked: Some(!layer.locked),
                ..LayerPatch::default()
            }),
            KeyCode::Char('v') => self.toggle_flag("Visibility", |layer| LayerPatch {
                visible: Some(!layer.visible),
                ..LayerPatch::default()
            }),
            KeyCode::Char('c') => {
                if let Some(id) = self.editor.selection() {
                    let result = self.editor.toggle_crop(id);
                    self.note_result("Crop", result);
                }
            }
            KeyCode::Char('e') => {
                if self.editor.selection().is_some() {
                    self.input_mode = InputMode::FieldEdit(String::new());
                } else {
                    self.status = String::from("Select a layer to edit");
                }
            }
            KeyCode::Left => self.nudge(-NUDGE_STEP, 0.0),
            KeyCode::Right => self.nudge(NUDGE_STEP, 0.0),
            KeyCode::Up => self.nudge(0.0, -NUDGE_STEP),
            KeyCode::Down => self.nudge(0.0, NUDGE_STEP),
            KeyCode::Tab => {
                self.editor.cycle_selection();
                self.sync_list_selection();
            }
            KeyCode::Esc => {
                let result = self.controller.cancel(&mut self.editor);
                self.note_result("Cancelled", result);
            }
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let point = self
            .renderer
            .cell_to_screen(mouse.column, mouse.row, self.canvas_area);
        let modifiers = Modifiers {
            shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !self
                    .canvas_area
                    .contains(Position::new(mouse.column, mouse.row))
                {
                    return;
                }
                let result = self.controller.pointer_down(&mut self.editor, point, modifiers);
                if let Err(e) = result {
                    self.report_error("Pointer", &e);
                }
                self.sync_list_selection();
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Err(e) = self.controller.pointer_move(&mut self.editor, point, modifiers) {
                    self.report_error("Pointer", &e);
                }
            }
            // Releasing anywhere ends the gesture
            MouseEventKind::Up(MouseButton::Left) => {
                let gesture = self.controller.state().name();
                let change = self.controller.pointer_up(&mut self.editor);
                if change.committed {
                    self.status = format!("Finished {gesture}");
                }
            }
            _ => {}
        }
    }

    fn reorder(&mut self, action: &str, direction: ZOrder) {
        if let Some(id) = self.editor.selection() {
            let change = self.editor.reorder_layer(id, direction);
            self.note(action, change);
        }
    }

    fn toggle_flag(&mut self, action: &str, patch: impl Fn(&Layer) -> LayerPatch) {
        if let Some(layer) = self.editor.selected_layer() {
            let (id, patch) = (layer.id, patch(layer));
            let result = self.editor.edit_layer(id, patch);
            self.note_result(action, result);
        }
    }

    fn nudge(&mut self, dx: f64, dy: f64) {
        if let Some(layer) = self.editor.selected_layer() {
            let (id, patch) = (layer.id, LayerPatch::position(layer.x + dx, layer.y + dy));
            let result = self.editor.edit_layer(id, patch);
            self.note_result("Nudged", result);
        }
    }

    fn submit_field_edit(&mut self, input: &str) {
        let Some(id) = self.editor.selection() else {
            self.status = String::from("Select a layer to edit");
            return;
        };
        let Some((field, value)) = input.trim().split_once(char::is_whitespace) else {
            self.status = String::from("Usage: <field> <value>, e.g. rotation 15");
            return;
        };
        let value = value.trim();
        // Preset names may contain spaces, e.g. `font Bebas Neue`
        let result = match field {
            "font" => self.editor.set_font(id, value),
            "gradient" => self.editor.apply_text_gradient_preset(id, value),
            "overlay" => self.editor.apply_overlay_preset(id, value),
            "backdrop" => self.editor.apply_backdrop_preset(id, value),
            _ => match field.parse::<NumericField>() {
                Ok(numeric) => self.editor.edit_numeric(id, numeric, value),
                Err(e) => return self.report_error("Edit", &e),
            },
        };
        self.note_result(&format!("Set {field}"), result);
    }

    fn note(&mut self, action: &str, change: Change) {
        self.status = if change.is_noop() {
            format!("{action}: nothing to do")
        } else {
            action.to_string()
        };
        self.sync_list_selection();
    }

    fn note_result(&mut self, action: &str, result: Result<Change, EditorError>) {
        match result {
            Ok(change) => self.note(action, change),
            Err(e) => self.report_error(action, &e),
        }
    }

    fn report_error(&mut self, action: &str, error: &EditorError) {
        warn!("{action} failed: {error}");
        self.status = format!("{action} failed: {error}");
    }

    /// The list shows layers front first, so indices run opposite to the
    /// store order
    fn sync_list_selection(&mut self) {
        let layers = self.editor.layers();
        let index = self
            .editor
            .selection()
            .and_then(|id| layers.iter().position(|layer| layer.id == id))
            .map(|index| layers.len() - 1 - index);
        self.layer_list_state.select(index);
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    init_logging(config.log_file.as_deref())?;

    let images: Vec<String> = env::args().skip(1).collect();
    info!("Starting lumina-cli with {} image(s)", images.len());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(settings::editor_settings(&config), &images);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(rows[0]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(columns[1]);

    draw_canvas(f, app, columns[0]);

    // Layers panel, front first
    let layer_items: Vec<ListItem> = app
        .editor
        .layers()
        .iter()
        .rev()
        .map(|layer| {
            let icon = match layer.kind {
                LayerKind::Text(_) => "T ",
                LayerKind::Image(_) => "▣ ",
            };
            let mut flags = String::new();
            if !layer.visible {
                flags.push_str(" (hidden)");
            }
            if layer.locked {
                flags.push_str(" (locked)");
            }
            ListItem::new(Line::from(vec![
                Span::raw(icon),
                Span::raw(layer.display_name().to_string()),
                Span::styled(flags, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let layers_list = List::new(layer_items)
        .block(Block::default().borders(Borders::ALL).title("Layers"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(layers_list, side[0], &mut app.layer_list_state);

    // Properties panel
    let properties_text = match app.editor.selected_layer() {
        Some(layer) => properties(layer),
        None => vec![Line::from("Click a layer or press Tab")],
    };
    let properties_panel = Paragraph::new(properties_text)
        .block(Block::default().borders(Borders::ALL).title("Properties"))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(properties_panel, side[1]);

    // Status line
    let history = app.editor.history();
    let position = history.cursor().map_or(0, |cursor| cursor + 1);
    let status = match &app.input_mode {
        InputMode::FieldEdit(buffer) => Line::from(vec![
            Span::styled("edit> ", Style::default().fg(Color::Yellow)),
            Span::raw(buffer.clone()),
        ]),
        InputMode::Normal => Line::from(vec![
            Span::raw(format!(
                "zoom {:.0}% | history {}/{} | v{} | {} | ",
                app.editor.viewport().zoom() * 100.0,
                position,
                history.len(),
                app.editor.version(),
                app.controller.state().name(),
            )),
            Span::styled(app.status.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
    };
    f.render_widget(Paragraph::new(vec![status]), rows[1]);

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("q: Quit | t/i: Add text/image | ^Z/^Y: Undo/Redo | "),
        Span::raw("Del: Delete | d: Duplicate | [ ] { }: Order | "),
        Span::raw("+/-: Zoom | g: Grid | l/v: Lock/Hide | c: Crop | e: Edit/Preset | Tab: Next"),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]).block(Block::default()), rows[2]);
}

fn draw_canvas(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Canvas");
    let inner = block.inner(area);
    f.render_widget(block, area);
    app.canvas_area = inner;

    let frame = app.renderer.render(&app.editor.scene());

    let canvas_rect = Rect::new(
        inner.x,
        inner.y,
        frame.width.min(inner.width),
        frame.height.min(inner.height),
    );
    let background: Vec<Line> = frame.background().into_iter().map(Line::from).collect();
    f.render_widget(
        Paragraph::new(background).style(Style::default().bg(Color::Black).fg(Color::DarkGray)),
        canvas_rect,
    );

    for cell_box in &frame.boxes {
        let Some(placed) = cell_box.place(inner) else {
            continue;
        };
        let border = if cell_box.selected {
            Style::default().fg(Color::Yellow)
        } else if cell_box.locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        f.render_widget(Clear, placed);
        f.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(cell_box.label.clone()),
            placed,
        );
    }
}

fn properties(layer: &Layer) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("name: {}", layer.display_name())),
        Line::from(format!("kind: {}", layer.kind.label())),
        Line::from(format!("x: {:.1}  y: {:.1}", layer.x, layer.y)),
        Line::from(format!("width: {:.1}  height: {:.1}", layer.width, layer.height)),
        Line::from(format!("rotation: {:.1}°", layer.rotation)),
        Line::from(format!("opacity: {:.2}", layer.opacity)),
        Line::from(format!("visible: {}  locked: {}", layer.visible, layer.locked)),
    ];

    match &layer.kind {
        LayerKind::Text(text) => {
            lines.push(Line::from(format!("text: {}", text.text)));
            lines.push(Line::from(format!("font_size: {:.0}", text.font_size)));
            lines.push(Line::from(format!(
                "fill: {}",
                if text.fill.is_gradient() { "gradient" } else { "solid" }
            )));
        }
        LayerKind::Image(image) => {
            lines.push(Line::from(format!("source: {}", image.source)));
            lines.push(Line::from(format!(
                "filters: {}",
                if image.filters.is_identity() { "none" } else { "active" }
            )));
            match &image.crop {
                Some(crop) => {
                    let frame = resolve_crop_frame(crop, layer.bounds().size());
                    lines.push(Line::from(format!(
                        "crop: {:.0}%x{:.0}% at ({:.2}, {:.2})",
                        crop.width * 100.0,
                        crop.height * 100.0,
                        crop.x,
                        crop.y
                    )));
                    lines.push(Line::from(format!(
                        "image frame: {:.0}% x {:.0}%",
                        frame.display_width, frame.display_height
                    )));
                }
                None => lines.push(Line::from("crop: none")),
            }
        }
    }
    lines
}
