// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Collection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Home,
    Characters,
    Planets,
    Transport,
}

impl Screen {
    pub const ALL: [Self; 4] = [Self::Home, Self::Characters, Self::Planets, Self::Transport];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Characters => "characters",
            Self::Planets => "planets",
            Self::Transport => "transport",
        }
    }
}

/// Sub-collection toggle of the transport screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportKind {
    Vehicles,
    Starships,
}

impl TransportKind {
    pub const fn collection(self) -> Collection {
        match self {
            Self::Vehicles => Collection::Vehicles,
            Self::Starships => Collection::Starships,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Starships => "starships",
        }
    }
}

/// Process-wide display preference, held in memory only. Defaults to dark
/// and does not persist across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub transport_kind: TransportKind,
    pub theme: Theme,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            transport_kind: TransportKind::Vehicles,
            theme: Theme::Dark,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextScreen,
    PrevScreen,
    GoTo(Screen),
    SetTransportKind(TransportKind),
    ToggleTheme,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    TransportKindChanged(TransportKind),
    ThemeChanged(Theme),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextScreen => self.rotate_screen(1),
            AppCommand::PrevScreen => self.rotate_screen(-1),
            AppCommand::GoTo(screen) => {
                self.screen = screen;
                vec![AppEvent::ScreenChanged(screen)]
            }
            AppCommand::SetTransportKind(kind) => {
                self.transport_kind = kind;
                vec![
                    AppEvent::TransportKindChanged(kind),
                    self.set_status(kind.label()),
                ]
            }
            AppCommand::ToggleTheme => {
                self.theme = self.theme.toggled();
                vec![
                    AppEvent::ThemeChanged(self.theme),
                    self.set_status(self.theme.label()),
                ]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_screen(&mut self, delta: isize) -> Vec<AppEvent> {
        let screens = Screen::ALL;
        let current = screens
            .iter()
            .position(|screen| *screen == self.screen)
            .unwrap_or(0) as isize;
        let len = screens.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.screen = screens[next];
        vec![AppEvent::ScreenChanged(self.screen)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
