use courier_optimizer::problem::service_clock::parse_clock_text;
use jiff::civil::Time;

pub fn parse_clock(input: &str) -> Result<Time, String> {
    parse_clock_text(input).ok_or_else(|| format!("Invalid time {input:?}, expected HH:MM or H:MM AM/PM"))
}

#[cfg(test)]
mod tests {
    use jiff::civil;

    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("10:05"), Ok(civil::time(10, 5, 0, 0)));
        assert_eq!(parse_clock("9:05 am"), Ok(civil::time(9, 5, 0, 0)));
        assert_eq!(parse_clock("12:45 PM"), Ok(civil::time(12, 45, 0, 0)));
        assert!(parse_clock("quarter past").is_err());
    }
}
