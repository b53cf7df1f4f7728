//! # Application Module
//!
//! Runs one command-line request against the theme menu. The command line is
//! the menu's surface: every subcommand refreshes the menu from the theme
//! roots and the settings store, then prints or changes it.
//!
//! ## Core Components
//!
//! - [`store`] - Selected settings backend and its source of outside changes
//! - [`render`] - Text and JSON output of menus and theme lists

pub mod render;
pub mod store;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::validation::{ThemeNameValidator, Validator};
use engine::{MenuError, ThemeMenu, ThemeScanner, ThemeStateSync};
use serde::Serialize;
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

pub use store::{ExternalChanges, StoreHandle};

pub struct App {
    store: StoreHandle,
    menu: ThemeMenu,
}

impl App {
    pub fn new(config: &AppConfig, force_memory_store: bool) -> Self {
        let store = StoreHandle::from_config(config.settings(), force_memory_store);
        Self::with_store(config, store)
    }

    pub fn with_store(config: &AppConfig, store: StoreHandle) -> Self {
        let scanner = ThemeScanner::new(config.theme_roots());
        let sync = ThemeStateSync::new(store.as_dyn(), config.settings().settings_key());
        Self {
            store,
            menu: ThemeMenu::new(scanner, sync),
        }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn menu(&self) -> &ThemeMenu {
        &self.menu
    }

    pub fn run<W: Write>(&mut self, command: &Command, out: &mut W) -> AppResult<()> {
        log::debug!("Running {command:?}");
        match command {
            Command::List { json, verbose } => self.list(*json, *verbose, out),
            Command::Current => self.current(out),
            Command::Menu { json } => self.show_menu(*json, out),
            Command::Set { name } => self.set(name, out),
            Command::Watch => {
                let changes = self.store.external_changes(self.menu.sync().key())?;
                let renders = self.watch(changes.receiver(), out)?;
                log::info!("Change source closed after {renders} updates");
                Ok(())
            }
        }
    }

    fn list<W: Write>(&self, json: bool, verbose: bool, out: &mut W) -> AppResult<()> {
        let report = self.menu.scanner().scan_with_report();

        match (json, verbose) {
            (true, true) => render::write_json(&report, out),
            (true, false) => render::write_json(&report.themes, out),
            (false, _) => {
                render::render_list(&report.themes, out)?;
                if verbose {
                    render::render_skipped(&report.skipped, out)?;
                }
                Ok(())
            }
        }
    }

    fn current<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let active = self.menu.sync().read_active()?;
        writeln!(out, "{active}")?;
        Ok(())
    }

    fn show_menu<W: Write>(&mut self, json: bool, out: &mut W) -> AppResult<()> {
        self.refresh_menu();
        if json {
            return render::write_json(&MenuSnapshot::of(&self.menu), out);
        }
        render::render_menu(&self.menu.markers(), out)?;
        Ok(())
    }

    fn set<W: Write>(&mut self, name: &str, out: &mut W) -> AppResult<()> {
        ThemeNameValidator.validate(name)?;

        self.refresh_menu();
        if !self.menu.theme_set().contains(name) {
            log::warn!("'{name}' is not an installed icon theme; setting it anyway");
        }

        self.menu.select(name)?;
        writeln!(out, "Icon theme set to {name}")?;
        Ok(())
    }

    /// Print the menu, then reprint it after every change received on
    /// `changes` until the channel disconnects. Returns the number of
    /// reprints.
    pub fn watch<W: Write>(
        &mut self,
        changes: &flume::Receiver<String>,
        out: &mut W,
    ) -> AppResult<usize> {
        self.refresh_menu();
        render::render_menu(&self.menu.markers(), out)?;
        out.flush()?;

        let changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&changed);
        self.menu.attach(move |_| flag.set(true));

        let result = self.follow_changes(changes, &changed, out);
        self.menu.detach();
        result
    }

    fn follow_changes<W: Write>(
        &mut self,
        changes: &flume::Receiver<String>,
        changed: &Cell<bool>,
        out: &mut W,
    ) -> AppResult<usize> {
        let key = self.menu.sync().key().clone();
        let mut renders = 0;

        for value in changes.iter() {
            self.store.deliver(&key, &value);
            if changed.replace(false) {
                writeln!(out)?;
                render::render_menu(&self.menu.markers(), out)?;
                out.flush()?;
                renders += 1;
            }
        }
        Ok(renders)
    }

    /// Rescan and reread; a store failure still leaves a usable menu.
    fn refresh_menu(&mut self) {
        match self.menu.refresh() {
            Ok(()) => {}
            Err(MenuError::Read(e)) => log::warn!("Active icon theme unknown: {e}"),
            Err(e) => log::warn!("{e}"),
        }
    }
}

#[derive(Serialize)]
struct MenuSnapshot {
    active: Option<String>,
    entries: Vec<engine::MenuEntry>,
}

impl MenuSnapshot {
    fn of(menu: &ThemeMenu) -> Self {
        let markers = menu.markers();
        Self {
            active: markers.active().map(str::to_string),
            entries: menu.entries(),
        }
    }
}
