use huffman_text::{decode, encode, FrequencyTable, Strategy};

fn main() -> huffman_text::Result<()> {
    let s = String::from("Hello my name is Sam!");
    let (container, stats) = encode(&s)?;

    if let Some(tree) = container.tree() {
        print!("{tree}");
    }
    let freq = FrequencyTable::analyze(&s)?;
    print!("{}", container.code_table().report(&freq));
    println!("{stats}");

    let dec = decode(&container, Strategy::Tree)?;
    println!("{:?}", dec);
    Ok(())
}
