use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::symbols;
use tui::text::{Span, Spans};
use tui::widgets::{
    Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph,
    Row, Table, Tabs, Wrap,
};
use tui::Frame;

use crate::app::{App, MenuItem};
use crate::filter::end_year_choices;
use crate::sort::Direction as SortDirection;

const MENU_TITLES: [&str; 3] = ["Table", "Graph", "Quit"];

pub fn draw<B: Backend>(rect: &mut Frame<B>, app: &App) {
    let size = rect.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(3)].as_ref())
        .split(size);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[0]);

    rect.render_widget(menu(app.active_menu_item), header_chunks[0]);
    rect.render_widget(summary(app), header_chunks[1]);

    match app.active_menu_item {
        MenuItem::Table => draw_table_tab(rect, app, chunks[1]),
        MenuItem::Graph => draw_graph_tab(rect, app, chunks[1]),
    }

    let help = Paragraph::new(help_text(app.active_menu_item))
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    rect.render_widget(help, chunks[2]);
}

fn menu(active: MenuItem) -> Tabs<'static> {
    let titles = MENU_TITLES
        .iter()
        .map(|t| {
            let (first, rest) = t.split_at(1);
            Spans::from(vec![
                Span::styled(
                    first,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(rest, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    Tabs::new(titles)
        .select(active.into())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw("|"))
}

fn summary<'a>(app: &App) -> Paragraph<'a> {
    let dataset = app.view.dataset();
    let text = format!(
        "{} of {} records match",
        app.view.rows().len(),
        dataset.len()
    );
    Paragraph::new(Spans::from(vec![Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD),
    )]))
    .block(Block::default().title("Survey").borders(Borders::ALL))
    .style(Style::default().fg(Color::Green))
    .alignment(Alignment::Center)
}

fn help_text(active: MenuItem) -> &'static str {
    match active {
        MenuItem::Table => {
            "Tab filter | Up/Down move | Space toggle | [ ] start year | { } end year | \
             Left/Right column | s sort | v show/hide | n/p page | +/- page size"
        }
        MenuItem::Graph => "m/M metric | u/U university | d/D degree",
    }
}

fn draw_table_tab<B: Backend>(rect: &mut Frame<B>, app: &App, area: Rect) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)].as_ref())
        .split(area);
    let controls = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)].as_ref())
        .split(body[0]);

    let years = match app.view.year_range() {
        Some(range) => {
            let choices = end_year_choices(app.view.dataset().years(), range.start())
                .into_iter()
                .map(|(year, enabled)| {
                    let style = if !enabled {
                        Style::default().fg(Color::DarkGray)
                    } else if year == range.end() {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Span::styled(format!("{year} "), style)
                })
                .collect::<Vec<_>>();
            vec![
                Spans::from(format!("{} to {}", range.start(), range.end())),
                Spans::from(choices),
            ]
        }
        None => vec![Spans::from("no years")],
    };
    let year_block = Paragraph::new(years)
        .block(Block::default().title("Year").borders(Borders::ALL))
        .alignment(Alignment::Center);
    rect.render_widget(year_block, controls[0]);

    let items: Vec<ListItem> = app
        .checklist_items()
        .into_iter()
        .map(|(value, selected)| {
            let mark = if selected { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {value}"))
        })
        .collect();
    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.checklist_cursor));
    }
    let checklist = List::new(items)
        .block(
            Block::default()
                .title(app.checklist_dimension().to_string())
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .highlight_symbol("> ");
    rect.render_stateful_widget(checklist, controls[1], &mut state);

    draw_records(rect, app, body[1]);
}

fn draw_records<B: Backend>(rect: &mut Frame<B>, app: &App, area: Rect) {
    let columns = app.view.visible_columns();
    let cursor = app.column_under_cursor();
    let sort = app.view.sort();

    let header = Row::new(columns.iter().map(|field| {
        let arrow = match sort {
            Some(order) if order.field == *field => match order.direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            },
            _ => "",
        };
        let style = if *field == cursor {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Yellow)
        };
        Cell::from(format!("{}{arrow}", field.header())).style(style)
    }))
    .height(1);

    let page = app.view.current_page();
    let rows: Vec<Row> = if page.rows.is_empty() {
        vec![Row::new(vec![Cell::from("No results.")])]
    } else {
        page.rows
            .iter()
            .map(|record| Row::new(columns.iter().map(|field| Cell::from(record.cell(*field)))))
            .collect()
    };

    let title = format!(
        "Page {} of {}{}{}",
        page.index + 1,
        app.view.page_count(),
        if page.has_previous { " | p: previous" } else { "" },
        if page.has_next { " | n: next" } else { "" },
    );
    let widths: Vec<Constraint> = if columns.is_empty() || page.rows.is_empty() {
        vec![Constraint::Percentage(100)]
    } else {
        columns
            .iter()
            .map(|_| Constraint::Ratio(1, columns.len() as u32))
            .collect()
    };
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .widths(&widths)
        .column_spacing(1);
    rect.render_widget(table, area);
}

fn draw_graph_tab<B: Backend>(rect: &mut Frame<B>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)].as_ref())
        .split(area);

    let query = app.query();
    let any = "any".to_string();
    let mut form = vec![
        Spans::from(format!("Metric: {}", query.metric)),
        Spans::from(format!(
            "University: {}",
            query.university.as_ref().unwrap_or(&any)
        )),
        Spans::from(format!("Degree: {}", query.degree.as_ref().unwrap_or(&any))),
    ];
    if !query.is_constrained() {
        form.push(Spans::from(Span::styled(
            "Pick a university or a degree to narrow the trend",
            Style::default().fg(Color::Red),
        )));
    }
    let builder = Paragraph::new(form)
        .block(Block::default().title("Chart Builder").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    rect.render_widget(builder, chunks[0]);

    let series = &app.series;
    let mut title = format!("{} by year", series.metric);
    if !series.rejected.is_empty() {
        title.push_str(&format!(" ({} unreadable cells skipped)", series.rejected.len()));
    }
    let block = Block::default().title(title).borders(Borders::ALL);

    let (range, (first_year, last_year)) = match (series.display_range(), series.year_span()) {
        (Some(range), Some(span)) => (range, span),
        _ => {
            let empty = Paragraph::new("No data found.")
                .block(block)
                .alignment(Alignment::Center);
            rect.render_widget(empty, chunks[1]);
            return;
        }
    };

    let data: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|p| (f64::from(p.year), p.value))
        .collect();
    let (x_min, x_max) = if first_year == last_year {
        (f64::from(first_year) - 1.0, f64::from(last_year) + 1.0)
    } else {
        (f64::from(first_year), f64::from(last_year))
    };
    let y_mid = (range.lower + range.upper) / 2.0;

    let datasets = vec![Dataset::default()
        .name(series.metric.key())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Year", Style::default().fg(Color::Gray)))
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.0}")),
                    Span::raw(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Data", Style::default().fg(Color::Gray)))
                .style(Style::default().fg(Color::Gray))
                .bounds([range.lower, range.upper])
                .labels(vec![
                    Span::raw(format!("{:.0}", range.lower)),
                    Span::raw(format!("{y_mid:.0}")),
                    Span::raw(format!("{:.0}", range.upper)),
                ]),
        );
    rect.render_widget(chart, chunks[1]);
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use crossterm::event::KeyCode;
    use tui::backend::TestBackend;
    use tui::Terminal;

    use super::draw;
    use crate::app::App;
    use crate::dataset::SurveyDataSet;
    use crate::fixtures::survey;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|rect| draw(rect, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    #[test]
    fn table_tab_shows_rows_and_paging() {
        let dataset = SurveyDataSet::new(survey());
        let app = App::new(&dataset, NonZeroUsize::new(5).unwrap());
        let screen = render(&app);
        assert!(screen.contains("7 of 7 records match"));
        assert!(screen.contains("Page 1 of 2"));
        assert!(screen.contains("[x] NTU"));
    }

    #[test]
    fn empty_filter_shows_no_results() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = App::new(&dataset, NonZeroUsize::new(5).unwrap());
        for _ in 0..3 {
            app.on_key(KeyCode::Char(' '));
            app.on_key(KeyCode::Down);
        }
        assert!(render(&app).contains("No results."));
    }

    #[test]
    fn graph_tab_reports_missing_data() {
        let dataset = SurveyDataSet::new(survey());
        let mut app = App::new(&dataset, NonZeroUsize::new(5).unwrap());
        app.on_key(KeyCode::Char('g'));
        assert!(render(&app).contains("No data found."));

        app.on_key(KeyCode::Char('d'));
        app.on_key(KeyCode::Char('d'));
        let screen = render(&app);
        assert!(!screen.contains("No data found."));
        assert!(screen.contains("Chart Builder"));
    }
}
