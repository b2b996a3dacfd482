//! Embedded subset of the ISSN List of Title Word Abbreviations (LTWA).
//!
//! Patterns ending in `-` match any word starting with the stem; other
//! patterns match whole words. `None` marks words the list keeps unabbreviated
//! ("n.a."), which shields them from shorter stems.

/// `(pattern, abbreviation)` pairs, lowercase and unaccented
pub const LTWA_ENTRIES: &[(&str, Option<&str>)] = &[
    ("academ-", Some("acad.")),
    ("account-", Some("acc.")),
    ("acid-", None),
    ("acoust-", Some("acoust.")),
    ("acta", None),
    ("adhes-", Some("adhes.")),
    ("administr-", Some("adm.")),
    ("advanc-", Some("adv.")),
    ("aeronaut-", Some("aeronaut.")),
    ("aerosp-", Some("aerosp.")),
    ("africa-", Some("afr.")),
    ("agricult-", Some("agric.")),
    ("agronom-", Some("agron.")),
    ("algebr-", Some("algebr.")),
    ("america-", Some("am.")),
    ("analy-", Some("anal.")),
    ("anatom-", Some("anat.")),
    ("anesthes-", Some("anesth.")),
    ("angewandte", Some("angew.")),
    ("animal", Some("anim.")),
    ("annal-", Some("ann.")),
    ("annual", Some("annu.")),
    ("anthropol-", Some("anthropol.")),
    ("antibiot-", Some("antibiot.")),
    ("antimicrob-", Some("antimicrob.")),
    ("antioxid-", Some("antioxid.")),
    ("appl-", Some("appl.")),
    ("approx-", Some("approx.")),
    ("aquat-", Some("aquat.")),
    ("archaeolog-", Some("archaeol.")),
    ("architect-", Some("archit.")),
    ("archiv-", Some("arch.")),
    ("artific-", Some("artif.")),
    ("assoc-", Some("assoc.")),
    ("astronom-", Some("astron.")),
    ("astrophys-", Some("astrophys.")),
    ("atmosph-", Some("atmos.")),
    ("atom-", Some("at.")),
    ("australia-", Some("aust.")),
    ("autom-", Some("autom.")),
    ("bacteriol-", Some("bacteriol.")),
    ("behav-", Some("behav.")),
    ("biocatal-", Some("biocatal.")),
    ("biochem-", Some("biochem.")),
    ("bioelectron-", Some("bioelectron.")),
    ("bioengin-", Some("bioeng.")),
    ("bioinform-", Some("bioinform.")),
    ("biolog-", Some("biol.")),
    ("biomater-", Some("biomater.")),
    ("biomed-", Some("biomed.")),
    ("biomol-", Some("biomol.")),
    ("biophys-", Some("biophys.")),
    ("biosci-", Some("biosci.")),
    ("biosens-", Some("biosens.")),
    ("biotechnol-", Some("biotechnol.")),
    ("botan-", Some("bot.")),
    ("brain", None),
    ("british", Some("br.")),
    ("bulletin", Some("bull.")),
    ("canad-", Some("can.")),
    ("cancer", None),
    ("carbohydr-", Some("carbohydr.")),
    ("cardiol-", Some("cardiol.")),
    ("cardiovasc-", Some("cardiovasc.")),
    ("catal-", Some("catal.")),
    ("cell", None),
    ("cellul-", Some("cell.")),
    ("central", Some("cent.")),
    ("ceram-", Some("ceram.")),
    ("chemi-", Some("chem.")),
    ("chemometr-", Some("chemom.")),
    ("chimi-", Some("chim.")),
    ("chinese", Some("chin.")),
    ("chromatogr-", Some("chromatogr.")),
    ("climat-", Some("clim.")),
    ("clinic-", Some("clin.")),
    ("cognit-", Some("cogn.")),
    ("colloid-", Some("colloid.")),
    ("communic-", Some("commun.")),
    ("comparat-", Some("comp.")),
    ("comput-", Some("comput.")),
    ("condens-", Some("condens.")),
    ("conferenc-", Some("conf.")),
    ("conserv-", Some("conserv.")),
    ("construct-", Some("constr.")),
    ("contemp-", Some("contemp.")),
    ("coordinat-", Some("coord.")),
    ("corros-", Some("corros.")),
    ("critic-", Some("crit.")),
    ("cryst-", Some("cryst.")),
    ("crystallogr-", Some("crystallogr.")),
    ("current", Some("curr.")),
    ("cybern-", Some("cybern.")),
    ("dermatol-", Some("dermatol.")),
    ("design-", Some("des.")),
    ("develop-", Some("dev.")),
    ("diagn-", Some("diagn.")),
    ("differ-", Some("differ.")),
    ("digit-", Some("digit.")),
    ("discov-", Some("discov.")),
    ("disease-", Some("dis.")),
    ("dynam-", Some("dyn.")),
    ("earth", None),
    ("ecolog-", Some("ecol.")),
    ("econom-", Some("econ.")),
    ("ecosyst-", Some("ecosyst.")),
    ("edit-", Some("ed.")),
    ("educat-", Some("educ.")),
    ("electr-", Some("electr.")),
    ("electroanal-", Some("electroanal.")),
    ("electrochem-", Some("electrochem.")),
    ("electron-", Some("electron.")),
    ("emerg-", Some("emerg.")),
    ("endocrinol-", Some("endocrinol.")),
    ("energet-", Some("energ.")),
    ("energy", None),
    ("engineer-", Some("eng.")),
    ("entomol-", Some("entomol.")),
    ("environ-", Some("environ.")),
    ("enzym-", Some("enzym.")),
    ("epidemiol-", Some("epidemiol.")),
    ("equation-", Some("equ.")),
    ("ergonom-", Some("ergon.")),
    ("europe-", Some("eur.")),
    ("evolut-", Some("evol.")),
    ("experiment-", Some("exp.")),
    ("faraday", None),
    ("food", None),
    ("forest-", Some("for.")),
    ("forum", None),
    ("frontier-", Some("front.")),
    ("fundam-", Some("fundam.")),
    ("gastroenterol-", Some("gastroenterol.")),
    ("general", Some("gen.")),
    ("genet-", Some("genet.")),
    ("genom-", Some("genom.")),
    ("geochem-", Some("geochem.")),
    ("geograph-", Some("geogr.")),
    ("geolog-", Some("geol.")),
    ("geophys-", Some("geophys.")),
    ("geoscien-", Some("geosci.")),
    ("global", Some("glob.")),
    ("health", None),
    ("hematol-", Some("hematol.")),
    ("hepatol-", Some("hepatol.")),
    ("heterocycl-", Some("heterocycl.")),
    ("histor-", Some("hist.")),
    ("hospital", Some("hosp.")),
    ("human", Some("hum.")),
    ("hydrol-", Some("hydrol.")),
    ("immunol-", Some("immunol.")),
    ("industr-", Some("ind.")),
    ("infect-", Some("infect.")),
    ("inform-", Some("inf.")),
    ("inorg-", Some("inorg.")),
    ("institut-", Some("inst.")),
    ("instrum-", Some("instrum.")),
    ("integr-", Some("integr.")),
    ("intellig-", Some("intell.")),
    ("interact-", Some("interact.")),
    ("interdiscip-", Some("interdiscip.")),
    ("interfaces", None),
    ("internal", Some("intern.")),
    ("international", Some("int.")),
    ("investig-", Some("investig.")),
    ("japan-", Some("jpn.")),
    ("journal", Some("j.")),
    ("kinet-", Some("kinet.")),
    ("laborat-", Some("lab.")),
    ("language", Some("lang.")),
    ("learn-", Some("learn.")),
    ("letter-", Some("lett.")),
    ("liquid", Some("liq.")),
    ("machin-", Some("mach.")),
    ("macromol-", Some("macromol.")),
    ("magnet-", Some("magn.")),
    ("manag-", Some("manag.")),
    ("materia-", Some("mater.")),
    ("mathemat-", Some("math.")),
    ("matter", None),
    ("measur-", Some("meas.")),
    ("mechan-", Some("mech.")),
    ("medic-", Some("med.")),
    ("membr-", Some("membr.")),
    ("metabol-", Some("metab.")),
    ("metall-", Some("metall.")),
    ("methods", None),
    ("microbiol-", Some("microbiol.")),
    ("microelectron-", Some("microelectron.")),
    ("microfluid-", Some("microfluid.")),
    ("microscop-", Some("microsc.")),
    ("mineral-", Some("mineral.")),
    ("model-", Some("model.")),
    ("modern", Some("mod.")),
    ("molec-", Some("mol.")),
    ("molecul-", Some("mol.")),
    ("nano", None),
    ("nanomater-", Some("nanomater.")),
    ("nanotechnol-", Some("nanotechnol.")),
    ("nation-", Some("natl.")),
    ("natur-", Some("nat.")),
    ("network-", Some("netw.")),
    ("neural", None),
    ("neurolog-", Some("neurol.")),
    ("neuropsychol-", Some("neuropsychol.")),
    ("neurosci-", Some("neurosci.")),
    ("new", None),
    ("nucl-", Some("nucl.")),
    ("nucleic", None),
    ("numer-", Some("numer.")),
    ("nutri-", Some("nutr.")),
    ("obstet-", Some("obstet.")),
    ("ocean-", Some("ocean.")),
    ("oceanogr-", Some("oceanogr.")),
    ("oncol-", Some("oncol.")),
    ("operat-", Some("oper.")),
    ("ophthalmol-", Some("ophthalmol.")),
    ("optic-", Some("opt.")),
    ("optim-", Some("optim.")),
    ("organ-", Some("org.")),
    ("orthop-", Some("orthop.")),
    ("pathol-", Some("pathol.")),
    ("pediatr-", Some("pediatr.")),
    ("percept-", Some("percept.")),
    ("perspect-", Some("perspect.")),
    ("pharmac-", Some("pharm.")),
    ("pharmacol-", Some("pharmacol.")),
    ("philosoph-", Some("philos.")),
    ("photochem-", Some("photochem.")),
    ("physic-", Some("phys.")),
    ("physik-", Some("phys.")),
    ("physiol-", Some("physiol.")),
    ("planet-", Some("planet.")),
    ("plant", None),
    ("pollut-", Some("pollut.")),
    ("polym-", Some("polym.")),
    ("populat-", Some("popul.")),
    ("practic-", Some("pract.")),
    ("prevent-", Some("prev.")),
    ("probab-", Some("probab.")),
    ("proceed-", Some("proc.")),
    ("process-", Some("process.")),
    ("product-", Some("prod.")),
    ("progr-", Some("prog.")),
    ("protein", None),
    ("psychiatr-", Some("psychiatr.")),
    ("psycholog-", Some("psychol.")),
    ("public-", Some("publ.")),
    ("pure", None),
    ("quant-", Some("quant.")),
    ("quantum", None),
    ("quarterly", Some("q.")),
    ("radiat-", Some("radiat.")),
    ("radiol-", Some("radiol.")),
    ("react-", Some("react.")),
    ("regulat-", Some("regul.")),
    ("rehabil-", Some("rehabil.")),
    ("religi-", Some("relig.")),
    ("renew-", Some("renew.")),
    ("report-", Some("rep.")),
    ("reproduct-", Some("reprod.")),
    ("research", Some("res.")),
    ("resour-", Some("resour.")),
    ("respirat-", Some("respir.")),
    ("review-", Some("rev.")),
    ("robot-", Some("robot.")),
    ("royal", Some("r.")),
    ("safety", None),
    ("scien-", Some("sci.")),
    ("scientif-", Some("sci.")),
    ("security", Some("secur.")),
    ("sediment-", Some("sediment.")),
    ("semicond-", Some("semicond.")),
    ("sensor-", Some("sens.")),
    ("simul-", Some("simul.")),
    ("social", Some("soc.")),
    ("societ-", Some("soc.")),
    ("soft", None),
    ("softw-", Some("softw.")),
    ("soil", None),
    ("solid", None),
    ("spectrom-", Some("spectrom.")),
    ("spectrosc-", Some("spectrosc.")),
    ("standard-", Some("stand.")),
    ("statist-", Some("stat.")),
    ("structur-", Some("struct.")),
    ("studi-", Some("stud.")),
    ("supramol-", Some("supramol.")),
    ("surface-", Some("surf.")),
    ("surg-", Some("surg.")),
    ("sustain-", Some("sustain.")),
    ("symposium", Some("symp.")),
    ("synth-", Some("synth.")),
    ("system-", Some("syst.")),
    ("technic-", Some("tech.")),
    ("technol-", Some("technol.")),
    ("tecton-", Some("tecton.")),
    ("telecommun-", Some("telecommun.")),
    ("textile-", Some("text.")),
    ("theor-", Some("theor.")),
    ("theory", None),
    ("therap-", Some("ther.")),
    ("thermal", Some("therm.")),
    ("thermodyn-", Some("thermodyn.")),
    ("topic-", Some("top.")),
    ("toxicol-", Some("toxicol.")),
    ("transact-", Some("trans.")),
    ("transl-", Some("transl.")),
    ("transport-", Some("transp.")),
    ("trends", None),
    ("tropic-", Some("trop.")),
    ("univers-", Some("univ.")),
    ("urolog-", Some("urol.")),
    ("vacuum", Some("vac.")),
    ("vascul-", Some("vasc.")),
    ("veterin-", Some("vet.")),
    ("vibrat-", Some("vib.")),
    ("virolog-", Some("virol.")),
    ("water", None),
    ("zeitschrift", Some("z.")),
    ("zoolog-", Some("zool.")),
];

/// Articles, prepositions and conjunctions dropped from abbreviated titles,
/// plus the part/section/series designators
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "and", "for", "in", "on", "at", "to", "by", "with", "from", "&", "+",
    "de", "der", "die", "das", "des", "du", "la", "le", "les", "el", "et", "und", "y", "fur",
    "part", "section", "series",
];

/// Journal names that denote preprint servers; never abbreviated
pub const PREPRINT_SERVERS: &[&str] = &["arXiv", "ChemRxiv", "bioRxiv", "medRxiv"];

/// Stylized leading words whose casing title-casing destroys
pub const STYLIZED_PREFIXES: &[&str] = &["npj", "eLife", "iScience", "mBio", "eNeuro", "mSystems"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_normalized() {
        for (pattern, abbreviation) in LTWA_ENTRIES {
            assert_eq!(*pattern, pattern.to_lowercase(), "{}", pattern);
            assert!(pattern.is_ascii(), "{}", pattern);
            if let Some(abbreviation) = abbreviation {
                assert!(abbreviation.ends_with('.'), "{}", abbreviation);
            }
        }
    }

    #[test]
    fn test_patterns_are_unique() {
        let mut patterns: Vec<&str> = LTWA_ENTRIES.iter().map(|(p, _)| *p).collect();
        let total = patterns.len();
        patterns.sort_unstable();
        patterns.dedup();
        assert_eq!(patterns.len(), total);
    }
}
