/*
  Trebuchet, a UCI-compatible chess engine.
  Copyright (C) 2023 The Trebuchet Authors

  Trebuchet is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Trebuchet is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The engine binary: print the license notice, then speak UCI on
//! standard input and output until `quit`.

fn main() {
    println!(
        "Trebuchet {} Copyright (C) 2023 The Trebuchet Authors",
        env!("CARGO_PKG_VERSION")
    );
    println!("This program comes with ABSOLUTELY NO WARRANTY; for details type `show w'.");
    println!("This is free software, and you are welcome to redistribute it");
    println!("under certain conditions; type `show c' for details.");

    trebuchet::uci::run();
}
