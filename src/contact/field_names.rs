const NAME_LEN: usize = 10;
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SEED_STEP: u64 = 0x9e37_79b9_7f4a_7c15;

fn split_mix(state: &mut u64) -> u64 {
    *state = state.wrapping_add(SEED_STEP);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Deterministic, form-safe field name for `seed`: a lowercase letter
/// followed by lowercase letters and digits.
pub fn generate_field_name(seed: u64) -> String {
    let mut state = seed;
    let mut name = String::with_capacity(NAME_LEN);
    let first = split_mix(&mut state);
    name.push(LETTERS[(first % LETTERS.len() as u64) as usize] as char);
    while name.len() < NAME_LEN {
        let next = split_mix(&mut state);
        name.push(ALPHANUMERIC[(next % ALPHANUMERIC.len() as u64) as usize] as char);
    }
    name
}

/// The per-render names of every contact form input.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNames {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub honeypot: String,
    pub confirm: String,
}

impl FieldNames {
    pub fn from_seed(seed: u64) -> Self {
        let mut taken: Vec<String> = Vec::with_capacity(6);
        let mut offset = 0u64;
        let mut next_name = || loop {
            offset += 1;
            let candidate = generate_field_name(seed.wrapping_add(offset.wrapping_mul(SEED_STEP)));
            if !taken.contains(&candidate) {
                taken.push(candidate.clone());
                break candidate;
            }
        };

        FieldNames {
            name: next_name(),
            email: next_name(),
            subject: next_name(),
            message: next_name(),
            honeypot: next_name(),
            confirm: next_name(),
        }
    }
}
