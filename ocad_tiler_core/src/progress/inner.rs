//! State and drawing of a single progress line.
//!
//! Work items that were skipped (tiles already on disk) count towards the position but not
//! towards the rate, so the estimate reflects the items that actually cost time.

use std::time::{Duration, Instant};

pub struct Inner {
	pub message: String,
	pub len: u64,
	pub pos: u64,
	pub skipped: u64,
	pub start: Instant,
	pub finished: bool,
	pub last_draw: Option<Instant>,
}

impl Inner {
	pub fn new(message: &str, len: u64) -> Inner {
		Inner {
			message: message.to_string(),
			len,
			pos: 0,
			skipped: 0,
			start: Instant::now(),
			finished: false,
			last_draw: None,
		}
	}

	pub fn redraw(&mut self) {
		if let Some(last_draw) = self.last_draw
			&& last_draw.elapsed() < Duration::from_millis(250)
			&& !self.finished
		{
			return;
		}
		self.last_draw = Some(Instant::now());

		let line = self.render_line(terminal_width());
		self.write(&format!("\r\x1b[2K{line}"));
	}

	pub fn render_line(&self, total_width: usize) -> String {
		let len = self.len.max(1);
		let pos = self.pos.min(len);
		let msg = &self.message;
		let worked = pos.saturating_sub(self.skipped);
		let elapsed = self.start.elapsed().as_secs_f64();
		let per_sec = if elapsed > 0.0 { worked as f64 / elapsed } else { 0.0 };
		let eta_secs = if per_sec > 0.0 {
			(len - pos) as f64 / per_sec
		} else {
			0.0
		};

		let percent = (pos as f64 * 100.0 / len as f64).floor() as u64;
		let kept = if self.skipped > 0 {
			format!(" {} kept", self.skipped)
		} else {
			String::new()
		};
		let per_sec_str = format_rate(per_sec);
		let eta_str = format_eta(Duration::from_secs_f64(eta_secs));

		let get_line =
			|bar: &str| format!("{msg}▕{bar}▏{pos}/{len} ({percent:>3}%){kept} {per_sec_str:>7} {eta_str:>5}");
		let bar_width = total_width.saturating_sub(get_line("").chars().count()).max(10);
		get_line(&make_bar(pos, len, bar_width))
	}

	#[allow(unused_variables)]
	pub fn write(&self, text: &str) {
		#[cfg(not(any(test, feature = "test")))]
		{
			use std::io::Write;
			let mut output = std::io::stderr();
			let _ = write!(output, "{text}");
			let _ = output.flush();
		}
	}
}

fn terminal_width() -> usize {
	terminal_size::terminal_size().map_or(80, |(width, _)| usize::from(width.0).max(10))
}

fn make_bar(pos: u64, len: u64, width: usize) -> String {
	let frac = (pos as f64 / len.max(1) as f64).clamp(0.0, 1.0);
	let exact = frac * width as f64;
	let whole = (exact.floor() as usize).min(width);
	let partials = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

	let mut bar = "█".repeat(whole);
	if whole < width {
		let idx = ((exact - whole as f64) * 8.0).floor() as usize;
		bar.push(partials[idx.min(7)]);
		bar.push_str(&" ".repeat(width - whole - 1));
	}
	bar
}

fn format_rate(per_sec: f64) -> String {
	if per_sec.is_finite() {
		human_number(per_sec) + "/s"
	} else {
		"--/s".to_string()
	}
}

fn human_number(v: f64) -> String {
	let abs = v.abs();
	if abs >= 1_000_000.0 {
		format!("{:.1}M", v / 1_000_000.0)
	} else if abs >= 1_000.0 {
		format!("{:.1}k", v / 1_000.0)
	} else {
		format!("{v:.0}")
	}
}

fn format_eta(d: Duration) -> String {
	let total = d.as_secs();
	let hours = total / 3_600;
	let minutes = (total % 3_600) / 60;
	let seconds = total % 60;

	if total < 60 {
		format!("{seconds}s")
	} else if total < 3_600 {
		format!("{minutes:02}:{seconds:02}")
	} else {
		format!("{hours}:{minutes:02}:{seconds:02}")
	}
}
