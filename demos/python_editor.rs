//! Python editor demo
//!
//! Opens a short Python file with highlighting and line numbers.
//! Ctrl+Shift+[ folds the block under the caret, Ctrl+Alt+] opens all folds.
//!
//! Run with:
//!     cargo run --example python_editor

use bevy::prelude::*;
use bevy_lite_editor::prelude::*;

const SAMPLE: &str = r#"#!/usr/bin/env python3
"""Fibonacci numbers, three ways."""

import functools


@functools.lru_cache(maxsize=None)
def fibonacci(n):
    # recursive with memoization
    if n <= 1:
        return n
    return fibonacci(n - 1) + fibonacci(n - 2)


class Sequence:
    def __init__(self, limit):
        self.limit = limit

    def __iter__(self):
        a, b = 0, 1
        for _ in range(self.limit):
            yield a
            a, b = b, a + b


def main():
    print(f"fib(30) = {fibonacci(30)}")
    print(list(Sequence(10)), 'it\'s done')


if __name__ == "__main__":
    main()
"#;

fn main() {
    let settings = EditorSettingsBuilder::new()
        .font_size(15.0)
        .theme_dark()
        .build();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bevy Lite Editor".to_string(),
                resolution: (1200, 800).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(
            CodeEditorPlugin::default()
                .with_settings(settings)
                .with_text(SAMPLE),
        )
        .add_systems(Update, log_line_count)
        .run();
}

fn log_line_count(mut events: MessageReader<LineCountChangedEvent>) {
    for event in events.read() {
        info!("{} -> {} lines", event.old, event.new);
    }
}
