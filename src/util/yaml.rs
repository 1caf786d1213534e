// Jetpack
// Copyright (C) 2023 - Michael DeHaan <michael@michaeldehaan.net> + contributors
// Copyright (C) 2025 - Riff.CC <https://riff.cc>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// long with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::path::Path;
use crate::util::terminal::{banner, markdown_print};

const YAML_ERROR_SHOW_LINES: usize = 5;
const YAML_ERROR_WIDTH: usize = 180;

/// Renders the lines around a YAML error so the bad line is easy to find.
/// `contents` is the text that failed to parse.
pub fn show_yaml_error_in_context(yaml_error: &serde_yaml::Error, path: &Path, contents: &str) {
    let mut message = yaml_error.to_string();
    if message.len() > YAML_ERROR_WIDTH {
        message.truncate(YAML_ERROR_WIDTH - 3);
        message.push_str("...");
    }

    if yaml_error.location().is_none() {
        markdown_print(&format!("|:-|\n|Error reading YAML file: {}|\n|{}|\n|-", path.display(), message));
        return;
    }
    banner(&format!("Error reading YAML file: {}, {}", path.display(), message));
    for line in yaml_error_context(yaml_error, contents) {
        println!("{}", line);
    }
}

/// The lines around the error, the failing one marked with `>>>`.
/// Empty when the error carries no location.
pub fn yaml_error_context(yaml_error: &serde_yaml::Error, contents: &str) -> Vec<String> {
    let location = match yaml_error.location() {
        Some(x) => x,
        None => return Vec::new(),
    };

    let error_line = location.line();
    let first = error_line.saturating_sub(YAML_ERROR_SHOW_LINES).max(1);
    let last = error_line + YAML_ERROR_SHOW_LINES;

    contents.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(num, _)| *num >= first && *num <= last)
        .map(|(num, line)| {
            if num == error_line {
                format!("     {:5}:{:5} | >>> | {}", num, location.column(), line)
            } else {
                format!("     {:5}       |     | {}", num, line)
            }
        })
        .collect()
}

/// Merge `b` into `a`. Mappings merge key by key, sequences append,
/// anything else in `b` replaces what is in `a`. A null `b` leaves a mapping alone.
pub fn blend_variables(a: &mut serde_yaml::Value, b: serde_yaml::Value) {
    match (a, b) {
        (serde_yaml::Value::Mapping(_), serde_yaml::Value::Null) => {},
        (serde_yaml::Value::Mapping(a), serde_yaml::Value::Mapping(b)) => {
            for (k, v) in b {
                match a.get_mut(&k) {
                    Some(serde_yaml::Value::Sequence(existing)) if v.is_sequence() => {
                        if let serde_yaml::Value::Sequence(mut more) = v {
                            existing.append(&mut more);
                        }
                    },
                    Some(existing) => blend_variables(existing, v),
                    None => {
                        a.insert(k, v);
                    }
                }
            }
        },
        (a, b) => *a = b,
    }
}
