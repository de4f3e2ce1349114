//! Rendering
//!
//! Five panes: domains, beans and labels stacked on the left, the generated
//! config top right and the log bottom right. Lists are drawn from the
//! selection cursors directly, so the scroll offset on screen is always the
//! one the selection model computed.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use crate::catalog::{Bean, Label};
use crate::selection::ListKind;

/// Screen areas of every pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub domains: Rect,
    pub beans: Rect,
    pub labels: Rect,
    pub config: Rect,
    pub log: Rect,
}

impl PaneLayout {
    /// Split the full terminal area
    pub fn compute(area: Rect) -> Self {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        Self {
            domains: left[0],
            beans: left[1],
            labels: left[2],
            config: right[0],
            log: right[1],
        }
    }

    /// Area of a list pane
    pub fn list(&self, list: ListKind) -> Rect {
        match list {
            ListKind::Domain => self.domains,
            ListKind::Bean => self.beans,
            ListKind::Label => self.labels,
        }
    }

    /// Rows available inside the border of a list pane
    pub fn rows(&self, list: ListKind) -> usize {
        usize::from(self.list(list).height.saturating_sub(2))
    }
}

/// Draw the whole screen
pub fn draw(f: &mut Frame, app: &App) {
    let layout = PaneLayout::compute(f.area());

    for list in ListKind::ALL {
        render_list(f, app, list, layout.list(list));
    }
    render_config(f, app, layout.config);
    render_log(f, app, layout.log);
}

fn render_list(f: &mut Frame, app: &App, list: ListKind, area: Rect) {
    let catalog = app.catalog();
    let selection = app.selection();
    let focused = app.focus() == list;

    let items: Vec<(String, bool)> = match list {
        ListKind::Domain => catalog
            .domains()
            .iter()
            .map(|d| {
                let used = d
                    .beans
                    .iter()
                    .any(|b| selection.is_bean_used(b) || selection.has_used_labels(&b.key()));
                (d.name.clone(), used)
            })
            .collect(),
        ListKind::Bean => selection
            .current_domain(catalog)
            .map(|d| {
                d.beans
                    .iter()
                    .map(|b| (bean_text(b), bean_used(app, b)))
                    .collect()
            })
            .unwrap_or_default(),
        ListKind::Label => selection
            .current_bean(catalog)
            .map(|b| {
                b.labels
                    .iter()
                    .map(|l| (label_text(l), selection.is_label_used(b, l)))
                    .collect()
            })
            .unwrap_or_default(),
    };

    let cursor = selection.cursor(list);
    let rows = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .skip(cursor.scroll_offset())
        .take(rows)
        .map(|(i, (text, used))| {
            let mut style = Style::default();
            if *used {
                style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
            }
            if i == cursor.position() {
                style = if focused {
                    style.add_modifier(Modifier::REVERSED)
                } else {
                    style.add_modifier(Modifier::UNDERLINED)
                };
            }
            Line::from(Span::styled(text.clone(), style))
        })
        .collect();

    let title = format!(" {} ({}) ", pane_title(list), items.len());
    let paragraph = Paragraph::new(lines).block(pane_block(title, focused));
    f.render_widget(paragraph, area);
}

fn render_config(f: &mut Frame, app: &App, area: Rect) {
    let mut block = pane_block(
        format!(" Config [{} mode] ", app.mode()),
        false,
    );
    if !app.status().is_empty() {
        block = block.title_bottom(format!(" {} ", app.status()));
    }
    let text = app.config_text();
    let rows = usize::from(area.height.saturating_sub(2));
    let paragraph = Paragraph::new(text.to_string())
        .block(block)
        .scroll((config_scroll(text.lines().count(), rows), 0));
    f.render_widget(paragraph, area);
}

/// First config line to show so the newest rules stay in view
fn config_scroll(total: usize, rows: usize) -> u16 {
    u16::try_from(total.saturating_sub(rows)).unwrap_or(u16::MAX)
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let rows = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = app
        .logs()
        .tail(rows)
        .into_iter()
        .map(Line::from)
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(pane_block(" Log ".to_string(), false))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn pane_title(list: ListKind) -> &'static str {
    match list {
        ListKind::Domain => "Domains",
        ListKind::Bean => "Beans",
        ListKind::Label => "Labels",
    }
}

fn bean_used(app: &App, bean: &Bean) -> bool {
    let selection = app.selection();
    selection.is_bean_used(bean) || selection.has_used_labels(&bean.key())
}

fn bean_text(bean: &Bean) -> String {
    if bean.attribute.is_empty() {
        format!("{} {}: {}", bean.name, bean.value_name, bean.value)
    } else {
        format!(
            "{} <{}>{}: {}",
            bean.name, bean.attribute, bean.value_name, bean.value
        )
    }
}

fn label_text(label: &Label) -> String {
    format!("{}={}", label.name, label.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::enumerator::ParsePolicy;
    use crate::error::PersistenceError;
    use crate::logging::LogBuffer;
    use crate::persist::Clipboard;
    use crate::transformer::RuleMode;
    use crate::ui::input::Action;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct NullClipboard;

    impl Clipboard for NullClipboard {
        fn set(&mut self, _contents: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    fn app() -> App {
        let catalog = Catalog::build(
            ["java.lang<type=Memory><HeapMemoryUsage>used: 1"],
            ParsePolicy::Abort,
        )
        .unwrap()
        .catalog;
        App::new(
            "localhost:9999",
            Arc::new(catalog),
            &Config::default(),
            Box::new(NullClipboard),
            LogBuffer::default(),
        )
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_layout_rows_exclude_borders() {
        let layout = PaneLayout::compute(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.rows(ListKind::Domain), usize::from(layout.domains.height) - 2);
        assert!(layout.config.x > layout.domains.x);
        assert!(layout.log.y > layout.config.y);
    }

    #[test]
    fn test_draw_shows_all_panes() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let app = app();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Domains (1)"));
        assert!(text.contains("Beans (1)"));
        assert!(text.contains("Labels (1)"));
        assert!(text.contains("java.lang"));
        assert!(text.contains("type=Memory"));
        assert!(text.contains("hostPort: localhost:9999"));
        assert!(text.contains("Log"));
    }

    #[test]
    fn test_config_scroll_follows_tail() {
        assert_eq!(config_scroll(5, 10), 0);
        assert_eq!(config_scroll(10, 10), 0);
        assert_eq!(config_scroll(25, 10), 15);
        assert_eq!(config_scroll(3, 0), 3);
    }

    #[test]
    fn test_config_pane_shows_last_rule() {
        let lines: Vec<String> = (0..20)
            .map(|i| format!("app.svc<type=Worker,name=w{i:02}><>Count: {i}"))
            .collect();
        let catalog = Catalog::build(&lines, ParsePolicy::Abort).unwrap().catalog;
        let mut config = Config::default();
        config.selection.mode = RuleMode::Bean;
        let mut app = App::new(
            "localhost:9999",
            Arc::new(catalog),
            &config,
            Box::new(NullClipboard),
            LogBuffer::default(),
        );
        app.apply(Action::NextPane);
        for _ in 0..20 {
            app.apply(Action::Toggle);
            app.apply(Action::Down);
        }
        assert_eq!(app.document().rules().len(), 20);

        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = screen(&terminal);
        let last = app.config_text().lines().last().unwrap().trim();
        assert!(text.contains(last), "missing {last:?}");
        assert!(!text.contains("hostPort"));
    }
}
