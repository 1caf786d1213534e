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

pub fn markdown_print(markdown: &str) {
    termimad::print_text(markdown);
}

pub fn banner(msg: &str) {
    markdown_print(&format!("|:-|\n|{}|\n|-", msg));
}

/// Builds the markdown for a two column table, one row per element.
pub fn two_column_markdown(header_a: &str, header_b: &str, elements: &[(String, String)]) -> String {
    let mut buffer = format!("|:-|:-\n|{}|{}\n", header_a, header_b);
    for (a, b) in elements.iter() {
        buffer.push_str("|-|-\n");
        buffer.push_str(&format!("|{}|{}\n", a, b));
    }
    buffer.push_str("|-|-\n");
    buffer
}

pub fn two_column_table(header_a: &str, header_b: &str, elements: &[(String, String)]) {
    markdown_print(&two_column_markdown(header_a, header_b, elements));
}

pub fn captioned_display(caption: &str, body: &str) {
    banner(caption);
    println!();
    for line in body.lines() {
        println!("    {}", line);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_column_markdown() {
        let rows = vec![
            (String::from("ansible_net_memfree_mb"), String::from("1024")),
            (String::from("ansible_net_memtotal_mb"), String::from("4096")),
        ];
        let md = two_column_markdown("Fact", "Value", &rows);
        assert!(md.starts_with("|:-|:-\n|Fact|Value\n"));
        assert!(md.contains("|ansible_net_memfree_mb|1024\n"));
        assert!(md.ends_with("|-|-\n"));
    }

    #[test]
    fn test_two_column_markdown_empty() {
        let md = two_column_markdown("Fact", "Value", &[]);
        assert_eq!(md, "|:-|:-\n|Fact|Value\n|-|-\n");
    }

    #[test]
    fn test_printing_does_not_panic() {
        banner("START cli/facts.yaml on connection=CLI");
        captioned_display("Failure", "line one\nline two");
        two_column_table("Fact", "Value", &[(String::from("a"), String::from("b"))]);
    }
}
