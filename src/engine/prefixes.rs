// ============================================================================
// Prefixes
// SI and IEC multiplier prefixes and longest-match decomposition of tokens
// ============================================================================

use smallvec::SmallVec;

/// A multiplier prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prefix {
    /// Full name, combined with unit names (`kilo` + `meter`)
    pub name: &'static str,
    /// Accepted symbols, combined with unit symbols (`k` + `m`)
    pub symbols: &'static [&'static str],
    pub factor: f64,
}

pub const SI_PREFIXES: [Prefix; 20] = [
    Prefix { name: "yotta", symbols: &["Y"], factor: 1e24 },
    Prefix { name: "zetta", symbols: &["Z"], factor: 1e21 },
    Prefix { name: "exa", symbols: &["E"], factor: 1e18 },
    Prefix { name: "peta", symbols: &["P"], factor: 1e15 },
    Prefix { name: "tera", symbols: &["T"], factor: 1e12 },
    Prefix { name: "giga", symbols: &["G"], factor: 1e9 },
    Prefix { name: "mega", symbols: &["M"], factor: 1e6 },
    Prefix { name: "kilo", symbols: &["k"], factor: 1e3 },
    Prefix { name: "hecto", symbols: &["h"], factor: 1e2 },
    Prefix { name: "deca", symbols: &["da"], factor: 1e1 },
    Prefix { name: "deci", symbols: &["d"], factor: 1e-1 },
    Prefix { name: "centi", symbols: &["c"], factor: 1e-2 },
    Prefix { name: "milli", symbols: &["m"], factor: 1e-3 },
    // micro sign, greek mu, ascii fallback
    Prefix { name: "micro", symbols: &["µ", "μ", "u"], factor: 1e-6 },
    Prefix { name: "nano", symbols: &["n"], factor: 1e-9 },
    Prefix { name: "pico", symbols: &["p"], factor: 1e-12 },
    Prefix { name: "femto", symbols: &["f"], factor: 1e-15 },
    Prefix { name: "atto", symbols: &["a"], factor: 1e-18 },
    Prefix { name: "zepto", symbols: &["z"], factor: 1e-21 },
    Prefix { name: "yocto", symbols: &["y"], factor: 1e-24 },
];

/// IEC binary prefixes. These never split a token; a catalog registers
/// their multiples as ordinary units on request.
pub const BINARY_PREFIXES: [Prefix; 6] = [
    Prefix { name: "kibi", symbols: &["Ki"], factor: 1024.0 },
    Prefix { name: "mebi", symbols: &["Mi"], factor: 1_048_576.0 },
    Prefix { name: "gibi", symbols: &["Gi"], factor: 1_073_741_824.0 },
    Prefix { name: "tebi", symbols: &["Ti"], factor: 1_099_511_627_776.0 },
    Prefix { name: "pebi", symbols: &["Pi"], factor: 1_125_899_906_842_624.0 },
    Prefix { name: "exbi", symbols: &["Ei"], factor: 1_152_921_504_606_846_976.0 },
];

/// How a prefix was spelled in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixForm {
    Name,
    Symbol,
}

/// A candidate split of a token into prefix and remainder.
#[derive(Debug, Clone, Copy)]
pub struct PrefixSplit<'a> {
    pub prefix: &'static Prefix,
    pub form: PrefixForm,
    pub remainder: &'a str,
}

/// All ways `token` starts with a prefix, longest prefix text first.
///
/// The remainder is never empty; whether it names a unit is up to the
/// caller.
pub fn split_prefixes(token: &str) -> SmallVec<[PrefixSplit<'_>; 4]> {
    let mut splits: SmallVec<[(usize, PrefixSplit<'_>); 4]> = SmallVec::new();

    for prefix in SI_PREFIXES.iter() {
        if let Some(remainder) = token.strip_prefix(prefix.name) {
            if !remainder.is_empty() {
                splits.push((
                    prefix.name.len(),
                    PrefixSplit { prefix, form: PrefixForm::Name, remainder },
                ));
            }
        }
        for symbol in prefix.symbols {
            if let Some(remainder) = token.strip_prefix(symbol) {
                if !remainder.is_empty() {
                    splits.push((
                        symbol.len(),
                        PrefixSplit { prefix, form: PrefixForm::Symbol, remainder },
                    ));
                }
            }
        }
    }

    // Stable sort keeps table order among equal lengths.
    splits.sort_by(|a, b| b.0.cmp(&a.0));
    splits.into_iter().map(|(_, split)| split).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_first() {
        let splits = split_prefixes("dam");
        assert_eq!(splits[0].prefix.name, "deca");
        assert_eq!(splits[0].remainder, "m");
        assert_eq!(splits[1].prefix.name, "deci");
        assert_eq!(splits[1].remainder, "am");
    }

    #[test]
    fn test_name_and_symbol_forms() {
        let splits = split_prefixes("kilometer");
        assert_eq!(splits[0].prefix.name, "kilo");
        assert_eq!(splits[0].form, PrefixForm::Name);
        assert_eq!(splits[0].remainder, "meter");

        let splits = split_prefixes("km");
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].form, PrefixForm::Symbol);
    }

    #[test]
    fn test_micro_spellings() {
        for token in ["µm", "μm", "um"] {
            let splits = split_prefixes(token);
            assert_eq!(splits[0].prefix.name, "micro", "token {}", token);
            assert_eq!(splits[0].remainder, "m");
        }
    }

    #[test]
    fn test_binary_factors_are_powers_of_1024() {
        for (power, prefix) in BINARY_PREFIXES.iter().enumerate() {
            assert_eq!(prefix.factor, 1024f64.powi(power as i32 + 1), "{}", prefix.name);
        }
        assert!(split_prefixes("KiB").is_empty());
    }

    #[test]
    fn test_bare_prefix_has_no_split() {
        assert!(split_prefixes("k").is_empty());
        assert!(split_prefixes("kilo").is_empty());
    }
}
