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

use crate::error::Result;
use crate::facts::result::{FactsRequest, FactsResult};

/// Anything that can answer a facts request. The harness only ever reads
/// through this trait, so implementations are shared by reference.
pub trait FactsGatherer: Send + Sync {
    /// Short name used in output and the run log.
    fn name(&self) -> String;

    fn gather(&self, request: &FactsRequest) -> Result<FactsResult>;
}
