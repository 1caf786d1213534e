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

//! START/END messages that bound a run, rendered from handlebars templates.
//! Templates see `test` (the run label) and `transport` (e.g. `cli`).

use crate::config::{Transport, DEFAULT_END_MARKER, DEFAULT_START_MARKER};
use crate::error::{NetfactsError, Result};
use handlebars::{handlebars_helper, Handlebars};
use serde_json::json;

pub struct RunMarkers {
    handlebars: Handlebars<'static>,
    start: String,
    end: String,
}

impl Default for RunMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_START_MARKER, DEFAULT_END_MARKER)
    }
}

impl RunMarkers {

    pub fn new(start: &str, end: &str) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        register_helpers(&mut handlebars);
        Self {
            handlebars,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn start(&self, test: &str, transport: Transport) -> Result<String> {
        self.render(&self.start, test, transport)
    }

    pub fn end(&self, test: &str, transport: Transport) -> Result<String> {
        self.render(&self.end, test, transport)
    }

    fn render(&self, template: &str, test: &str, transport: Transport) -> Result<String> {
        let data = json!({ "test": test, "transport": transport.label() });
        self.handlebars.render_template(template, &data)
            .map_err(|e| NetfactsError::Template(format!("{}: {}", template, e)))
    }
}

fn register_helpers(handlebars: &mut Handlebars) {
    {
        handlebars_helper!(to_upper_case: |v: str| v.to_uppercase());
        handlebars.register_helper("to_upper_case", Box::new(to_upper_case))
    }
    {
        handlebars_helper!(to_lower_case: |v: str| v.to_lowercase());
        handlebars.register_helper("to_lower_case", Box::new(to_lower_case))
    }
}
