//! Templates compiled into the crate, namespaced by vendor.

/// `(vendor, name, source)`
const BUILTIN: &[(&str, &str, &str)] = &[
    (
        "cisco",
        "show_int_status",
        include_str!("../../templates/cisco/show_int_status.textfsm"),
    ),
    (
        "cisco",
        "show_int_desc",
        include_str!("../../templates/cisco/show_int_desc.textfsm"),
    ),
    (
        "cisco",
        "show_int_trans_det",
        include_str!("../../templates/cisco/show_int_trans_det.textfsm"),
    ),
    (
        "cisco",
        "show_lldp_nei_det",
        include_str!("../../templates/cisco/show_lldp_nei_det.textfsm"),
    ),
    (
        "cisco",
        "show_poe",
        include_str!("../../templates/cisco/show_poe.textfsm"),
    ),
    (
        "cisco",
        "show_tdr",
        include_str!("../../templates/cisco/show_tdr.textfsm"),
    ),
    (
        "brocade",
        "show_int",
        include_str!("../../templates/brocade/show_int.textfsm"),
    ),
    (
        "brocade",
        "show_media",
        include_str!("../../templates/brocade/show_media.textfsm"),
    ),
    (
        "brocade",
        "show_optic",
        include_str!("../../templates/brocade/show_optic.textfsm"),
    ),
    (
        "brocade",
        "show_lldp_nei_det",
        include_str!("../../templates/brocade/show_lldp_nei_det.textfsm"),
    ),
    (
        "brocade",
        "show_poe",
        include_str!("../../templates/brocade/show_poe.textfsm"),
    ),
    (
        "brocade",
        "show_tdr",
        include_str!("../../templates/brocade/show_tdr.textfsm"),
    ),
];

/// Look up a built-in template. A trailing `.textfsm` is ignored.
pub fn lookup(vendor: &str, name: &str) -> Option<&'static str> {
    let name = name.strip_suffix(".textfsm").unwrap_or(name);
    BUILTIN
        .iter()
        .find(|(v, n, _)| *v == vendor && *n == name)
        .map(|(_, _, source)| *source)
}

/// Names of the built-in templates for a vendor.
pub fn names(vendor: &str) -> impl Iterator<Item = &'static str> + '_ {
    BUILTIN
        .iter()
        .filter(move |(v, _, _)| *v == vendor)
        .map(|(_, n, _)| *n)
}
