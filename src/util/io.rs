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

use std::fs;
use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process;

// open a file, mapping the error to something a user can act on
pub fn file_open(path: &Path) -> Result<fs::File, String> {
    fs::File::open(path).map_err(
        |_x| format!("unable to open file: {}", path.display())
    )
}

pub fn read_local_file(path: &Path) -> Result<String, String> {
    let mut file = file_open(path)?;
    let mut buffer = String::new();
    file.read_to_string(&mut buffer).map_err(
        |x| format!("unable to read file: {}, {:?}", path.display(), x)
    )?;
    Ok(buffer)
}

pub fn is_executable(path: &Path) -> bool {
    let metadata = match fs::metadata(path) {
        Ok(x) => x,
        Err(_) => return false,
    };
    metadata.is_file() && (metadata.permissions().mode() & 0o111) != 0
}

pub fn quit(s: &str) -> ! {
    // only for main.rs
    eprintln!("{}", s);
    process::exit(0x01)
}
