// src/cli/state.rs
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::{ListState, TableState};

use crate::analytics::{ExpenseSummary, ForecastOutcome};
use crate::cli::api::Client;
use crate::cli::input::LineEdit;
use crate::cli::util;
use crate::database::models::{Category, Expense, NewExpense};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Expenses,
    AddExpense,
    Dashboard,
    Help,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Expenses, Tab::AddExpense, Tab::Dashboard, Tab::Help];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Expenses => "Expenses",
            Self::AddExpense => "Add Expense",
            Self::Dashboard => "Dashboard",
            Self::Help => "Help",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Amount,
    Date,
    Description,
}

impl EditField {
    fn next(self) -> EditField {
        use EditField::*;
        match self { Title => Amount, Amount => Date, Date => Description, Description => Title }
    }
    fn prev(self) -> EditField {
        use EditField::*;
        match self { Title => Description, Description => Date, Date => Amount, Amount => Title }
    }
}

#[derive(Default)]
pub struct ExpensesPage {
    pub list: Vec<Expense>,
    pub tsel: TableState,
}

#[derive(Default, Clone)]
pub struct AddExpenseForm {
    pub title: LineEdit,
    pub amount: LineEdit,
    pub date: LineEdit,
    pub description: LineEdit,
    pub categories: Vec<Category>,
    pub cat_sel: ListState,
    pub editing: Option<EditField>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl AddExpenseForm {
    pub fn field(&self, f: EditField) -> &LineEdit {
        match f {
            EditField::Title => &self.title,
            EditField::Amount => &self.amount,
            EditField::Date => &self.date,
            EditField::Description => &self.description,
        }
    }

    fn field_mut(&mut self, f: EditField) -> &mut LineEdit {
        match f {
            EditField::Title => &mut self.title,
            EditField::Amount => &mut self.amount,
            EditField::Date => &mut self.date,
            EditField::Description => &mut self.description,
        }
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.cat_sel.selected().and_then(|i| self.categories.get(i))
    }
}

pub struct Dashboard {
    pub summary: ExpenseSummary,
    pub forecast: ForecastOutcome,
}

pub struct App {
    pub api: Client,
    pub tab: Tab,
    pub status: String,
    pub quit: bool,
    pub expenses: ExpensesPage,
    pub add: AddExpenseForm,
    pub dashboard: Option<Dashboard>,
}

impl App {
    pub fn new(api: Client) -> Self {
        let mut add = AddExpenseForm::default();
        add.date.set(util::iso(&util::today()));

        Self {
            api,
            tab: Tab::Expenses,
            status: "Press ? for help | Tab to switch | q to quit".into(),
            quit: false,
            expenses: ExpensesPage::default(),
            add,
            dashboard: None,
        }
    }

    pub async fn refresh_expenses(&mut self) -> anyhow::Result<()> {
        self.expenses.list = self.api.list_expenses().await?;
        let len = self.expenses.list.len();
        match self.expenses.tsel.selected() {
            _ if len == 0 => self.expenses.tsel.select(None),
            None => self.expenses.tsel.select(Some(0)),
            Some(i) if i >= len => self.expenses.tsel.select(Some(len - 1)),
            Some(_) => {}
        }
        Ok(())
    }

    async fn reload_expenses(&mut self) {
        if let Err(e) = self.refresh_expenses().await {
            self.status = format!("Refresh failed: {e}");
        }
    }

    pub async fn refresh_dashboard(&mut self) -> anyhow::Result<()> {
        let (summary, forecast) = self.api.analytics().await?;
        self.dashboard = Some(Dashboard { summary, forecast });
        Ok(())
    }

    pub async fn load_categories(&mut self) {
        if self.add.categories.is_empty() {
            if let Ok(list) = self.api.list_categories().await {
                self.add.categories = list;
            }
        }
        if self.add.cat_sel.selected().is_none() && !self.add.categories.is_empty() {
            self.add.cat_sel.select(Some(0));
        }
    }

    pub fn current_expense(&self) -> Option<&Expense> {
        let idx = self.expenses.tsel.selected()?;
        self.expenses.list.get(idx)
    }

    fn move_expense(&mut self, delta: isize) {
        let n = self.expenses.list.len();
        if n == 0 { self.expenses.tsel.select(None); return; }
        let cur = self.expenses.tsel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        self.expenses.tsel.select(Some(next));
    }

    fn move_cat(&mut self, delta: isize) {
        let len = self.add.categories.len();
        if len == 0 { self.add.cat_sel.select(None); return; }
        let cur = self.add.cat_sel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(len as isize) as usize;
        self.add.cat_sel.select(Some(next));
    }

    async fn switch_to(&mut self, tab: Tab) {
        self.tab = tab;
        match tab {
            Tab::Expenses => self.reload_expenses().await,
            Tab::AddExpense => self.load_categories().await,
            Tab::Dashboard => {
                if let Err(e) = self.refresh_dashboard().await {
                    self.status = format!("Analytics failed: {e}");
                }
            }
            Tab::Help => {}
        }
    }

    pub async fn handle_key(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        if k.kind != KeyEventKind::Press { return Ok(()); }

        if self.tab == Tab::AddExpense && self.add.editing.is_some() {
            self.handle_edit_input(k);
            return Ok(());
        }

        match k.code {
            KeyCode::Char('q') => {
                self.quit = true;
                return Ok(());
            }
            KeyCode::Char('?') => {
                self.tab = Tab::Help;
                return Ok(());
            }
            KeyCode::Tab => {
                self.switch_to(self.tab.next()).await;
                return Ok(());
            }
            _ => {}
        }

        match self.tab {
            Tab::Expenses => match k.code {
                KeyCode::Up => self.move_expense(-1),
                KeyCode::Down => self.move_expense(1),
                KeyCode::Char('a') => self.switch_to(Tab::AddExpense).await,
                KeyCode::Char('r') => self.reload_expenses().await,
                KeyCode::Char('x') | KeyCode::Delete => {
                    if let Some(id) = self.current_expense().map(|e| e.id) {
                        match self.api.delete_expense(id).await {
                            Ok(_) => {
                                self.status = "Deleted.".into();
                                self.dashboard = None;
                                self.reload_expenses().await;
                            }
                            Err(e) => self.status = format!("Delete failed: {e}"),
                        }
                    }
                }
                _ => {}
            },
            Tab::AddExpense => match k.code {
                KeyCode::Up => self.move_cat(-1),
                KeyCode::Down => self.move_cat(1),
                KeyCode::Char('t') | KeyCode::Enter => self.add.editing = Some(EditField::Title),
                KeyCode::Char('a') => self.add.editing = Some(EditField::Amount),
                KeyCode::Char('d') => self.add.editing = Some(EditField::Date),
                KeyCode::Char('n') => self.add.editing = Some(EditField::Description),
                KeyCode::Char('s') => self.submit_expense().await?,
                KeyCode::Esc | KeyCode::Char('b') => {
                    self.add.error = None;
                    self.switch_to(Tab::Expenses).await;
                }
                _ => {}
            },
            Tab::Dashboard => match k.code {
                KeyCode::Char('r') => self.switch_to(Tab::Dashboard).await,
                KeyCode::Esc | KeyCode::Char('b') => self.switch_to(Tab::Expenses).await,
                _ => {}
            },
            Tab::Help => match k.code {
                KeyCode::Esc | KeyCode::Char('b') => self.tab = Tab::Expenses,
                _ => {}
            },
        }
        Ok(())
    }

    fn handle_edit_input(&mut self, k: KeyEvent) {
        let Some(field) = self.add.editing else { return };
        match k.code {
            KeyCode::Enter | KeyCode::Esc => self.add.editing = None,
            KeyCode::Tab => self.add.editing = Some(field.next()),
            KeyCode::BackTab => self.add.editing = Some(field.prev()),
            KeyCode::Char(c) => self.add.field_mut(field).push(c),
            KeyCode::Backspace => self.add.field_mut(field).backspace(),
            KeyCode::Delete => self.add.field_mut(field).delete(),
            KeyCode::Left => self.add.field_mut(field).left(),
            KeyCode::Right => self.add.field_mut(field).right(),
            _ => {}
        }
    }

    /// Validates the form into a request, recording the first problem on the form.
    pub fn build_expense(&mut self) -> Option<NewExpense> {
        let amount = match util::parse_money(self.add.amount.trimmed()) {
            Some(d) if d.is_sign_negative() => {
                self.add.error = Some("Amount cannot be negative".into());
                return None;
            }
            Some(d) => d,
            None => {
                self.add.error = Some("Invalid amount format".into());
                return None;
            }
        };

        let date = if self.add.date.trimmed().is_empty() {
            util::today()
        } else {
            match util::parse_date(self.add.date.trimmed()) {
                Some(d) => d,
                None => {
                    self.add.error = Some("Format: YYYY-MM-DD".into());
                    return None;
                }
            }
        };

        let non_empty = |f: &LineEdit| {
            let s = f.trimmed();
            if s.is_empty() { None } else { Some(s.to_string()) }
        };

        Some(NewExpense {
            title: non_empty(&self.add.title),
            amount,
            category: self.add.selected_category().map(|c| c.name.clone()),
            date: Some(util::iso(&date)),
            description: non_empty(&self.add.description),
        })
    }

    pub async fn submit_expense(&mut self) -> anyhow::Result<()> {
        let Some(req) = self.build_expense() else {
            self.add.success = None;
            return Ok(());
        };

        match self.api.create_expense(&req).await {
            Ok(saved) => {
                self.add.success = Some(format!("Saved #{}", saved.id));
                self.add.error = None;
                self.add.title.clear();
                self.add.amount.clear();
                self.add.description.clear();
                self.dashboard = None;
                self.reload_expenses().await;
            }
            Err(e) => {
                self.add.error = Some(format!("Save failed: {e}"));
                self.add.success = None;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::{migrate, queries};
    use crossterm::event::KeyModifiers;

    async fn test_app() -> App {
        let client = Client::sqlite("sqlite::memory:", 1).await.unwrap();
        migrate::run_migrations(client.pool()).await.unwrap();
        queries::seed_fixed_categories(client.pool()).await.unwrap();
        App::new(client)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_into(app: &mut App, field: char, text: &str) {
        app.handle_key(key(KeyCode::Char(field))).await.unwrap();
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
    }

    #[tokio::test]
    async fn saving_from_the_form_adds_an_expense() {
        let mut app = test_app().await;
        app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
        assert_eq!(app.tab, Tab::AddExpense);
        assert!(app.add.selected_category().is_some());

        type_into(&mut app, 't', "Lunch").await;
        type_into(&mut app, 'a', "14.50").await;
        app.add.date.set("2024/06/03");
        app.handle_key(key(KeyCode::Char('s'))).await.unwrap();

        assert_eq!(app.add.error, None);
        assert!(app.add.success.is_some());
        assert_eq!(app.expenses.list.len(), 1);
        let saved = &app.expenses.list[0];
        assert_eq!(saved.title.as_deref(), Some("Lunch"));
        assert_eq!(saved.date.as_deref(), Some("2024-06-03"));
        assert_eq!(saved.category.as_deref(), Some("Bills"));
        assert!(app.add.amount.value.is_empty());
    }

    #[tokio::test]
    async fn bad_amount_is_reported_not_saved() {
        let mut app = test_app().await;
        app.switch_to(Tab::AddExpense).await;
        app.add.amount.set("12,00");
        app.submit_expense().await.unwrap();
        assert_eq!(app.add.error.as_deref(), Some("Invalid amount format"));

        app.add.amount.set("-3");
        app.submit_expense().await.unwrap();
        assert_eq!(app.add.error.as_deref(), Some("Amount cannot be negative"));
        assert!(app.api.list_expenses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn typing_q_inside_a_field_does_not_quit() {
        let mut app = test_app().await;
        app.switch_to(Tab::AddExpense).await;
        type_into(&mut app, 't', "quiche").await;
        assert!(!app.quit);
        assert_eq!(app.add.title.value, "quiche");

        app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
        assert!(app.quit);
    }

    #[tokio::test]
    async fn dashboard_reflects_stored_expenses() {
        let mut app = test_app().await;
        for (amount, date) in [("100", "2024-01-10"), ("200", "2024-02-10")] {
            app.api
                .create_expense(&NewExpense {
                    amount: amount.parse().unwrap(),
                    date: Some(date.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        app.switch_to(Tab::Dashboard).await;
        let dashboard = app.dashboard.as_ref().unwrap();
        assert_eq!(dashboard.summary.expense_count, 2);
        assert!(dashboard.forecast.is_projected());
    }

    #[tokio::test]
    async fn deleting_the_selected_row() {
        let mut app = test_app().await;
        app.api
            .create_expense(&NewExpense { amount: "5".parse().unwrap(), ..Default::default() })
            .await
            .unwrap();
        app.refresh_expenses().await.unwrap();
        assert_eq!(app.expenses.tsel.selected(), Some(0));

        app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
        assert!(app.expenses.list.is_empty());
        assert_eq!(app.expenses.tsel.selected(), None);
        assert_eq!(app.status, "Deleted.");
    }

    #[tokio::test]
    async fn failed_refresh_is_reported_in_the_status_bar() {
        let mut app = test_app().await;
        app.api.pool().close().await;

        app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
        assert!(app.status.starts_with("Refresh failed: "), "{}", app.status);
        assert!(app.expenses.list.is_empty());
    }

    #[test]
    fn tabs_cycle_in_order() {
        assert_eq!(Tab::Expenses.next(), Tab::AddExpense);
        assert_eq!(Tab::Help.next(), Tab::Expenses);
        assert_eq!(Tab::Dashboard.index(), 2);
    }
}
