/// Shell sort with the gap sequence `len/2, len/4, ..., 1`.
pub fn shell_sort(values: &mut [f64]) {
    let n = values.len();
    let mut gap = n / 2;

    while gap > 0 {
        // Gapped insertion sort: values[..gap] are trivially gap-sorted
        for i in gap..n {
            let current = values[i];
            let mut j = i;
            while j >= gap && values[j - gap] > current {
                values[j] = values[j - gap];
                j -= gap;
            }
            values[j] = current;
        }
        gap /= 2;
    }
}

/// Shell sort with Hibbard gaps `2^k - 1`, starting from the largest gap
/// below the slice length.
pub fn hibbard_sort(values: &mut [f64]) {
    let n = values.len();
    if n < 2 {
        return;
    }

    let highest_bit = usize::BITS - 1 - n.leading_zeros();
    let mut gap = (1usize << highest_bit) - 1;

    while gap >= 1 {
        for i in gap..n {
            let mut j = i;
            while j >= gap && values[j - gap] > values[j] {
                values.swap(j, j - gap);
                j -= gap;
            }
        }
        gap /= 2;
    }
}
