use color_print::cprintln;

use crate::state::AssemblerResult;

/// Prints the decoded program and the resolved symbol table.
pub fn print_dump(result: &AssemblerResult) {
    cprintln!("------+---------------------------------------------");
    for (pc, inst) in result.instructions.iter().enumerate() {
        cprintln!(" <green>{:0>4X}</> | {}", pc, inst.cformat());
    }
    cprintln!("------+---------------------------------------------");
    for (name, sym) in result.symbols.iter() {
        if sym.built_in {
            cprintln!(" <blue>0x{:0>4X}</> {} (built-in)", sym.address, name);
        } else {
            cprintln!(" <green>0x{:0>4X}</> {}", sym.address, name);
        }
    }
}
