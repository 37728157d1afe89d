use std::env;

mod html5ever;
mod span_invariants;

fn enabled(var: &str) -> bool {
    env::var(var).map_or(false, |x| x == "1")
}

pub fn run(s: &[u8]) {
    let mut did_anything = enabled("FUZZ_BASIC");

    // unconditionally run the parser against the input, it should never crash. we rely on running
    // in debug mode such that this is not just simply optimized away
    let units: Vec<u16> = s
        .chunks(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
        .collect();
    html5arbor::parse(&units);

    let data = match std::str::from_utf8(s) {
        Ok(data) => data,
        Err(_) => return,
    };
    html5arbor::parse(data);

    if enabled("FUZZ_HTML5EVER") {
        html5ever::run_html5ever(data);
        did_anything = true;
    }

    if enabled("FUZZ_SPAN_INVARIANTS") {
        span_invariants::validate_span_invariants(data);
        did_anything = true;
    }

    if !did_anything {
        panic!("running empty testcase, enable either FUZZ_BASIC, FUZZ_HTML5EVER or FUZZ_SPAN_INVARIANTS");
    }
}
