use std::io::{self, BufRead, Write};

use swiss_tournament_core::{Match, Standings, Tournament};

/// A single line prompt on stdin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Prompt<'a> {
    msg: &'a str,
}

impl<'a> Prompt<'a> {
    #[inline]
    pub fn new(msg: &'a str) -> Self {
        Self { msg }
    }

    /// Reads a single trimmed line. Returns `None` on end of input.
    pub fn read(&self) -> io::Result<Option<String>> {
        {
            let mut writer = io::stdout();
            writer.write_all(self.msg.as_bytes())?;
            writer.write_all(b": ")?;
            writer.flush()?;
        }

        let mut string = String::new();
        match io::stdin().lock().read_line(&mut string)? {
            0 => Ok(None),
            _ => Ok(Some(string.trim().to_owned())),
        }
    }

    /// Reads lines until an empty line or the end of input.
    pub fn read_all(&self) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();

        while let Some(line) = self.read()? {
            if line.is_empty() {
                break;
            }

            lines.push(line);
        }

        Ok(lines)
    }
}

pub fn print_matches(tournament: &Tournament, matches: &[Match]) {
    println!("Table | A | B | Outcome | Match");
    for m in matches {
        let b = match m.competitor_b {
            Some(b) => tournament.name_of(b),
            None => "BYE",
        };

        println!(
            "{} | {} | {} | {} | {}",
            m.table,
            tournament.name_of(m.competitor_a),
            b,
            m.outcome,
            m.id
        );
    }
}

pub fn print_standings(standings: &Standings) {
    println!("Rank | Name | Points | MW% | OW% | OOW% | LP | Byes | Key");
    for s in standings {
        println!(
            "{} | {} | {} | {:.1} | {:.1} | {:.1} | {} | {} | {}",
            s.rank,
            s.name,
            s.points,
            s.match_win,
            s.opp_win,
            s.opp_opp_win,
            s.loss_penalty_padded(),
            s.byes,
            s.key
        );
    }
}
