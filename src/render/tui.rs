use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::Color::White;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as Segment};
use ratatui::widgets::{Block, Borders, Cell, Padding, Row, Table};

use crate::config::PlotConfig;
use crate::error::RenderError;
use crate::reader::electric::ElectricNetwork;
use crate::render::scale::WidthScale;
use crate::render::svg::Viewport;

pub struct MapView<'a> {
    network: &'a ElectricNetwork,
    scale: Option<WidthScale>,
    viewport: Viewport,
}

impl<'a> MapView<'a> {
    pub fn new(network: &'a ElectricNetwork, config: &PlotConfig) -> Result<Self, RenderError> {
        Ok(Self {
            network,
            scale: WidthScale::for_network(network, config),
            viewport: Viewport::for_map(network, None).ok_or(RenderError::EmptyNetwork)?,
        })
    }
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Shows the map in the terminal until `q` or `Esc` is pressed.
pub fn show(network: &ElectricNetwork, config: &PlotConfig) -> Result<(), RenderError> {
    let view = MapView::new(network, config)?;
    let mut terminal = ratatui::init();
    let _guard = TerminalGuard;

    loop {
        terminal
            .draw(|frame| draw_map(frame, &view))
            .map_err(RenderError::Terminal)?;

        if crossterm::event::poll(Duration::from_millis(16)).map_err(RenderError::Terminal)? {
            match crossterm::event::read().map_err(RenderError::Terminal)? {
                Event::Key(key)
                    if key.kind == KeyEventKind::Press
                        && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) =>
                {
                    break;
                }
                _ => continue,
            }
        }
    }
    Ok(())
}

pub fn draw_map(frame: &mut Frame, view: &MapView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(frame.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(40)])
        .split(rows[1]);

    frame.render_widget(build_header(view), rows[0]);
    frame.render_widget(build_canvas(view), columns[0]);
    frame.render_widget(build_station_table(view), columns[1]);
}

/// Terminal cells have one thickness, so heavier lines get brighter colours.
fn line_color(fraction: f64) -> Color {
    if fraction < 1.0 / 3.0 {
        Color::DarkGray
    } else if fraction < 2.0 / 3.0 {
        Color::Gray
    } else {
        Color::White
    }
}

fn build_header<'a>(view: &MapView<'a>) -> Block<'a> {
    Block::new()
        .title(Line::from(vec![
            Span::raw(" Grid ").style(Style::default().bold().cyan()),
            Span::raw(" Stations: ").style(Style::default().add_modifier(Modifier::DIM)),
            Span::raw(view.network.node_count().to_string()).style(Style::default().bold()),
            Span::raw(" Connections: ").style(Style::default().add_modifier(Modifier::DIM)),
            Span::raw(view.network.arc_count().to_string()).style(Style::default().bold()),
            Span::raw("  q to quit ").style(Style::default().add_modifier(Modifier::DIM)),
        ]))
        .title_alignment(Alignment::Center)
}

fn build_canvas<'a>(view: &'a MapView<'a>) -> impl ratatui::widgets::Widget + 'a {
    let vp = view.viewport;
    let top = vp.min_y + vp.height;
    // image rows grow downwards, canvas rows upwards
    let flip = move |y: f64| top - (y - vp.min_y);

    Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Map "))
        .marker(Marker::Braille)
        .x_bounds([vp.min_x, vp.min_x + vp.width])
        .y_bounds([vp.min_y, top])
        .paint(move |ctx| {
            let network = view.network;
            for arc in network.arcs() {
                let (Some(from), Some(to)) = (network.node(arc.from()), network.node(arc.to())) else {
                    continue;
                };
                let color = line_color(view.scale.map_or(0.0, |s| s.fraction(arc.weight())));
                let (a, b) = (from.value(), to.value());
                ctx.draw(&Segment::new(a.x, flip(a.y), b.x, flip(b.y), color));
            }
            ctx.layer();
            for node in network.nodes() {
                let p = node.value();
                ctx.print(
                    p.x,
                    flip(p.y),
                    Span::styled(node.name().to_string(), Style::default().bold().white()),
                );
            }
        })
}

fn build_station_table<'a>(view: &MapView<'a>) -> Table<'a> {
    let network = view.network;
    Table::new(
        network.nodes().iter().map(|node| {
            let p = node.value();
            Row::new(vec![
                Cell::from(node.name().to_string()),
                Cell::from(format!("{:>6.0}", p.x)),
                Cell::from(format!("{:>6.0}", p.y)),
                Cell::from(format!("{:>3}", node.arcs_in().len())),
                Cell::from(format!("{:>3}", node.arcs_out().len())),
            ])
        }),
        [
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(4),
            Constraint::Length(4),
        ],
    )
    .header(
        Row::new([
            Cell::from("Code"),
            Cell::from("     x"),
            Cell::from("     y"),
            Cell::from(" in"),
            Cell::from("out"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::from(" Stations ").style(Style::default().bold()),
            ]))
            .padding(Padding::horizontal(1)),
    )
}
